//! This crate provides a growable array that stores its elements in a single
//! contiguous allocation, with an explicit capacity growth policy and
//! checked position handles.
//!
//! The [`DynArray`] allows accessing elements at any index in constant time and
//! appending in amortized constant time. In compromise, inserting or erasing in
//! the middle takes *O*(*n*) time, since the tail has to be shifted.
//!
//! Here is a quick example showing how the array works.
//!
//! ```
//! use dyn_array::{dyn_array, DynArray};
//!
//! let mut array = DynArray::new();
//! array.push_back(1).unwrap();
//! array.push_back(2).unwrap();
//! array.push_back(3).unwrap();
//! assert_eq!(array.capacity(), 4);
//!
//! // insert 99 before the element at offset 1
//! array.insert(array.begin() + 1, 99).unwrap();
//! assert_eq!(array, [1, 99, 2, 3]);
//!
//! // erase the element at offset 2
//! array.erase(array.begin() + 2).unwrap();
//! assert_eq!(array, dyn_array![1, 99, 3]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the array is like the following graph:
//! ```text
//!    ╔═══════════╗
//!    ║    ptr    ║ ──────┐
//!    ╟───────────╢       ↓
//!    ║    cap    ║     ┌───────┬───────┬┄┄┄┬───────┬╌╌╌╌╌╌╌┬╌╌╌┬╌╌╌╌╌╌╌┐
//!    ╟───────────╢     │ T [0] │ T [1] │   │T [n-1]│       ┊   ┊       ┊
//!    ║    len    ║     └───────┴───────┴┄┄┄┴───────┴╌╌╌╌╌╌╌┴╌╌╌┴╌╌╌╌╌╌╌┘
//!    ╟───────────╢      ←─────── len = n, live ──────→←── uninitialized ──→
//!    ║    id     ║      ←───────────────────── cap slots ───────────────────→
//!    ╟───────────╢
//!    ║(generation║
//!    ╚═══════════╝
//!       DynArray
//! ```
//! The `DynArray` contains:
//! - a pointer `ptr` to the buffer, which is not allocated until it is needed;
//! - the number `cap` of slots in the buffer;
//! - the number `len` of live elements, always at the front of the buffer;
//! - an identity `id` that every handle taken from the array remembers;
//! - a `generation` counter, bumped whenever the storage may have moved or
//!   shifted. It can be disabled by disabling the `generation` feature in your
//!   `Cargo.toml`:
//! ```text
//! [dependencies]
//! dyn_array = { default-features = false }
//! ```
//!
//! When an element has to be added to a full array, the capacity becomes
//! `max(4, cap * 2)` ([`MIN_NON_ZERO_CAP`] and [`GROWTH_FACTOR`]). The elements
//! are moved to the new buffer and the old one is released.
//! [`DynArray::reserve`] allocates exactly the requested capacity, and only
//! [`DynArray::shrink_to_fit`] ever makes the buffer smaller.
//!
//! # Positions
//!
//! A [`Position`] is a copyable handle to a slot, made of an offset from the
//! first slot. In an array with length *n*, `begin()` is offset 0 and `end()` is
//! offset *n*. Positions do not borrow the array; they are checked when handed
//! back to it:
//! - a position of another array is rejected as [`PositionError::ForeignArray`];
//! - a position taken before the storage changed is rejected as
//!   [`PositionError::Stale`] (with the `generation` feature);
//! - a position outside the live range is rejected as
//!   [`PositionError::OutOfBounds`].
//!
//! Operations that change the storage return fresh positions where one is
//! meaningful, like [`DynArray::insert`] and [`DynArray::erase`].
//!
//! ## Examples
//!
//! ```
//! use dyn_array::{dyn_array, ArrayError, PositionError};
//!
//! let mut array = dyn_array![1, 2, 3];
//! let old = array.begin();
//! let pos = array.insert(array.end(), 4).unwrap();
//! assert_eq!(array.at_position(pos), Ok(&4));
//! # #[cfg(feature = "generation")]
//! assert!(matches!(
//!     array.at_position(old),
//!     Err(ArrayError::InvalidPosition(PositionError::Stale { .. }))
//! ));
//! # let _ = old;
//! ```
//!
//! If mixing up arrays should be a compile error instead, see the [`branded`]
//! module.
//!
//! # Iteration
//!
//! Iterating over an array is by the [`Iter`] and [`IterMut`] iterators. These are
//! double-ended and exact-size iterators. [`IntoIter`] moves the elements out of
//! the array, and [`Drain`] empties the array but keeps its buffer.
//!
//! ## Examples
//!
//! ```
//! use dyn_array::DynArray;
//!
//! let mut array = DynArray::from_iter([1, 2, 3]);
//! let mut iter = array.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next_back(), Some(&3));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), None);
//!
//! array.iter_mut().for_each(|item| *item *= 2);
//! assert_eq!(Vec::from_iter(array), vec![2, 4, 6]);
//! ```
//!
//! # Cursors
//!
//! Beside iteration, the cursors [`Cursor`] and [`CursorMut`] provide more
//! flexible ways of viewing an array. They borrow the array, so they can never
//! go stale. In an array with length *n*, there are *n* + 1 valid locations
//! for the cursor, indexed by 0, 1, ..., *n*.
//!
//! [`CursorMut`] can also edit the array around its location:
//! - [`insert`]: insert a new item before the cursor;
//! - [`remove`]: remove the item at the cursor;
//! - [`backspace`]: remove the item before the cursor.
//!
//! ## Examples
//!
//! ```
//! use dyn_array::DynArray;
//!
//! let mut array = DynArray::from_iter([1, 2, 3, 4]);
//!
//! let mut cursor = array.cursor_start_mut();
//!
//! cursor.insert(5).unwrap(); // becomes [5, 1, 2, 3, 4], points to 1
//! assert_eq!(cursor.current(), Some(&1));
//!
//! assert!(cursor.seek_forward(2).is_ok());
//! assert_eq!(cursor.remove(), Some(3)); // becomes [5, 1, 2, 4], points to 4
//! assert_eq!(cursor.current(), Some(&4));
//!
//! assert_eq!(cursor.backspace(), Some(2)); // becomes [5, 1, 4], points to 4
//! assert_eq!(cursor.current(), Some(&4));
//!
//! assert_eq!(array, [5, 1, 4]);
//! ```
//!
//! # Errors
//!
//! Every operation with a precondition returns a [`Result`] with an
//! [`ArrayError`]. Only the `Index` operator panics, like a slice does, and the
//! infallible traits (`Clone`, `FromIterator`, `Extend`) abort on allocation
//! failure like the standard collections.
//!
//! [`Cursor`]: crate::array::cursor::Cursor
//! [`CursorMut`]: crate::array::cursor::CursorMut
//! [`insert`]: crate::array::cursor::CursorMut::insert
//! [`remove`]: crate::array::cursor::CursorMut::remove
//! [`backspace`]: crate::array::cursor::CursorMut::backspace

#[doc(inline)]
pub use array::cursor::{Cursor, CursorMut};
#[doc(inline)]
pub use array::iterator::{Drain, IntoIter, Iter, IterMut};
#[doc(inline)]
pub use array::position::Position;
#[doc(inline)]
pub use array::{DynArray, GROWTH_FACTOR, MIN_NON_ZERO_CAP};
#[doc(inline)]
pub use error::{ArrayError, PositionError};

pub mod array;
pub mod branded;
pub mod error;

/// Creates a [`DynArray`] containing the arguments, like `vec!`.
///
/// - `dyn_array![a, b, c]` creates an array of the given elements, with a
///   tight allocation;
/// - `dyn_array![x; n]` creates an array of `n` clones of `x`.
///
/// # Panics
///
/// Aborts if the allocation fails, like the `FromIterator` implementation.
///
/// # Examples
///
/// ```
/// use dyn_array::dyn_array;
///
/// let array = dyn_array![1, 2, 3];
/// assert_eq!(array, [1, 2, 3]);
/// assert_eq!(array.capacity(), 3);
///
/// let array = dyn_array![String::from("x"); 2];
/// assert_eq!(array, ["x", "x"]);
///
/// let array: dyn_array::DynArray<u8> = dyn_array![];
/// assert!(array.is_empty());
/// ```
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynArray::new()
    };
    ($elem:expr; $n:expr) => {
        <$crate::DynArray<_> as ::core::iter::FromIterator<_>>::from_iter(
            ::core::iter::repeat($elem).take($n),
        )
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynArray::from([$($x),+])
    };
}

#[cfg(test)]
mod tests {
    use crate::DynArray;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    /// An edit applied to both a `DynArray` and a `Vec` model.
    #[derive(Clone, Debug)]
    enum Op {
        Push(i16),
        Pop,
        Insert(usize, i16),
        Erase(usize),
        Resize(u8, i16),
        Reserve(u8),
        Shrink,
        Clear,
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut Gen) -> Self {
            match u8::arbitrary(g) % 8 {
                0 | 1 => Op::Push(i16::arbitrary(g)),
                2 => Op::Pop,
                3 => Op::Insert(usize::arbitrary(g), i16::arbitrary(g)),
                4 => Op::Erase(usize::arbitrary(g)),
                5 => Op::Resize(u8::arbitrary(g) % 32, i16::arbitrary(g)),
                6 => Op::Reserve(u8::arbitrary(g)),
                _ => {
                    if bool::arbitrary(g) {
                        Op::Shrink
                    } else {
                        Op::Clear
                    }
                }
            }
        }
    }

    #[quickcheck]
    fn behaves_like_vec(ops: Vec<Op>) -> bool {
        let mut array = DynArray::new();
        let mut model = Vec::new();
        for op in ops {
            match op {
                Op::Push(x) => {
                    array.push_back(x).unwrap();
                    model.push(x);
                }
                Op::Pop => assert_eq!(array.pop_back().ok(), model.pop()),
                Op::Insert(at, x) => {
                    let at = at % (model.len() + 1);
                    array.insert(array.begin() + at, x).unwrap();
                    model.insert(at, x);
                }
                Op::Erase(at) => {
                    if model.is_empty() {
                        assert!(array.erase(array.begin()).is_err());
                    } else {
                        let at = at % model.len();
                        array.erase(array.begin() + at).unwrap();
                        model.remove(at);
                    }
                }
                Op::Resize(len, x) => {
                    array.resize(len as usize, x).unwrap();
                    model.resize(len as usize, x);
                }
                Op::Reserve(cap) => {
                    let before = array.capacity();
                    array.reserve(cap as usize).unwrap();
                    assert_eq!(array.capacity(), before.max(cap as usize));
                }
                Op::Shrink => {
                    array.shrink_to_fit().unwrap();
                    assert_eq!(array.capacity(), array.len());
                }
                Op::Clear => {
                    array.clear();
                    model.clear();
                }
            }
            assert!(array.len() <= array.capacity());
        }
        array == model
    }

    #[quickcheck]
    fn push_sequence_preserves_order(xs: Vec<u32>) -> bool {
        let mut array = DynArray::new();
        for &x in &xs {
            array.push_back(x).unwrap();
        }
        array.len() == xs.len() && array == xs && array.iter().eq(xs.iter())
    }

    #[quickcheck]
    fn pop_inverts_push(xs: Vec<u32>, x: u32) -> bool {
        let mut array = DynArray::from(xs.clone());
        array.push_back(x).unwrap();
        array.pop_back() == Ok(x) && array == xs
    }

    #[quickcheck]
    fn clone_is_isolated(xs: Vec<String>) -> bool {
        let mut source = DynArray::from(xs.clone());
        let copy = source.clone();
        source.push_back(String::from("extra")).unwrap();
        source.iter_mut().for_each(|s| s.push('!'));
        copy == xs && copy.capacity() == xs.len()
    }

    #[quickcheck]
    fn reserve_keeps_storage(xs: Vec<u8>, extra: u8) -> bool {
        let mut array = DynArray::from(xs);
        let cap = array.len() + extra as usize;
        array.reserve(cap).unwrap();
        let ptr = array.as_ptr();
        let end = array.end();
        array.reserve(cap).unwrap();
        array.as_ptr() == ptr && array.capacity() == cap && array.is_valid_position(end)
    }

    #[quickcheck]
    fn insert_then_erase_restores(xs: Vec<i32>, at: usize, x: i32) -> bool {
        let original = DynArray::from(xs);
        let mut array = original.clone();
        let at = at % (array.len() + 1);
        let pos = array.insert(array.begin() + at, x).unwrap();
        array.erase(pos).unwrap();
        array == original
    }

    #[test]
    fn macro_forms() {
        let array = dyn_array![1, 2, 3,];
        assert_eq!(array, [1, 2, 3]);
        let array = dyn_array![0u8; 5];
        assert_eq!(array, [0; 5]);
        assert_eq!(array.capacity(), 5);
        let array: DynArray<()> = dyn_array![(); 0];
        assert!(array.is_empty());
    }
}
