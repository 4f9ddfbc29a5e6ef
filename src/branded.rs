//! Arrays whose positions are branded at compile time.
//!
//! A plain [`Position`] remembers which array produced it and is rejected at
//! runtime when handed to another one. A [`BrandedPosition`] carries the
//! invariant `'id` brand of its [`BrandedArray`] instead, so mixing up arrays
//! does not compile at all. Staleness and bounds are still checked when a
//! position is used.
//!
//! Every branded array lives inside the closure passed to [`with_branded`],
//! which introduces a fresh brand through a [`GhostToken`].
//!
//! # Examples
//!
//! ```
//! use dyn_array::branded::with_branded;
//!
//! let array = with_branded(|mut array| {
//!     array.push_back(1).unwrap();
//!     array.push_back(3).unwrap();
//!     let pos = array.insert(array.begin() + 1, 2).unwrap();
//!     assert_eq!(array.get(pos), Ok(&2));
//!     array.into_inner()
//! });
//! assert_eq!(array, [1, 2, 3]);
//! ```
//!
//! Handing a position to a different branded array is a compile error:
//!
//! ```compile_fail
//! use dyn_array::branded::with_branded;
//!
//! with_branded(|mut outer| {
//!     outer.push_back(1).unwrap();
//!     let pos = outer.begin();
//!     with_branded(|mut inner| {
//!         inner.push_back(2).unwrap();
//!         let _ = inner.get(pos);
//!     });
//! });
//! ```
//!
//! [`Position`]: crate::Position

use crate::array::position::Position;
use crate::array::DynArray;
use crate::error::ArrayError;
use ghost_cell::{GhostCell, GhostToken};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

/// A [`DynArray`] tied to the brand `'id`.
///
/// The array sits in a [`GhostCell`] and is only reachable through the token
/// stored next to it, so shared access goes through `&self` and exclusive
/// access through `&mut self` exactly as for the plain array.
pub struct BrandedArray<'id, T> {
    token: GhostToken<'id>,
    cell: GhostCell<'id, DynArray<T>>,
}

/// A [`Position`](crate::Position) that only a [`BrandedArray`] of the same
/// brand accepts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BrandedPosition<'id> {
    pos: Position,
    _brand: PhantomData<GhostToken<'id>>,
}

impl<'id> BrandedPosition<'id> {
    fn new(pos: Position) -> Self {
        Self {
            pos,
            _brand: PhantomData,
        }
    }

    /// Returns the signed offset of the handle from the first slot.
    pub fn offset(&self) -> isize {
        self.pos.offset()
    }
}

impl<'id> Add<usize> for BrandedPosition<'id> {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self::new(self.pos + rhs)
    }
}

impl<'id> Sub<usize> for BrandedPosition<'id> {
    type Output = Self;

    fn sub(self, rhs: usize) -> Self::Output {
        Self::new(self.pos - rhs)
    }
}

/// Run `f` with a new, empty [`BrandedArray`] under a fresh brand.
pub fn with_branded<T, F, R>(f: F) -> R
where
    F: for<'id> FnOnce(BrandedArray<'id, T>) -> R,
{
    GhostToken::new(|token| {
        f(BrandedArray {
            token,
            cell: GhostCell::new(DynArray::new()),
        })
    })
}

impl<'id, T> BrandedArray<'id, T> {
    /// Views the underlying array.
    pub fn as_array(&self) -> &DynArray<T> {
        self.cell.borrow(&self.token)
    }

    fn as_array_mut(&mut self) -> &mut DynArray<T> {
        self.cell.borrow_mut(&mut self.token)
    }

    /// Give up the brand and return the underlying array.
    pub fn into_inner(self) -> DynArray<T> {
        self.cell.into_inner()
    }

    /// See [`DynArray::len`].
    pub fn len(&self) -> usize {
        self.as_array().len()
    }

    /// See [`DynArray::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.as_array().is_empty()
    }

    /// See [`DynArray::capacity`].
    pub fn capacity(&self) -> usize {
        self.as_array().capacity()
    }

    /// See [`DynArray::as_slice`].
    pub fn as_slice(&self) -> &[T] {
        self.as_array().as_slice()
    }

    /// See [`DynArray::push_back`].
    pub fn push_back(&mut self, value: T) -> Result<(), ArrayError> {
        self.as_array_mut().push_back(value)
    }

    /// See [`DynArray::pop_back`].
    pub fn pop_back(&mut self) -> Result<T, ArrayError> {
        self.as_array_mut().pop_back()
    }

    /// See [`DynArray::begin`].
    pub fn begin(&self) -> BrandedPosition<'id> {
        BrandedPosition::new(self.as_array().begin())
    }

    /// See [`DynArray::end`].
    pub fn end(&self) -> BrandedPosition<'id> {
        BrandedPosition::new(self.as_array().end())
    }

    /// See [`DynArray::insert`].
    pub fn insert(
        &mut self,
        pos: BrandedPosition<'id>,
        value: T,
    ) -> Result<BrandedPosition<'id>, ArrayError> {
        self.as_array_mut()
            .insert(pos.pos, value)
            .map(BrandedPosition::new)
    }

    /// See [`DynArray::erase`].
    pub fn erase(&mut self, pos: BrandedPosition<'id>) -> Result<BrandedPosition<'id>, ArrayError> {
        self.as_array_mut().erase(pos.pos).map(BrandedPosition::new)
    }

    /// See [`DynArray::at_position`].
    pub fn get(&self, pos: BrandedPosition<'id>) -> Result<&T, ArrayError> {
        self.as_array().at_position(pos.pos)
    }

    /// See [`DynArray::at_position_mut`].
    pub fn get_mut(&mut self, pos: BrandedPosition<'id>) -> Result<&mut T, ArrayError> {
        self.as_array_mut().at_position_mut(pos.pos)
    }
}

impl<'id, T: fmt::Debug> fmt::Debug for BrandedArray<'id, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BrandedArray").field(self.as_array()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::branded::with_branded;
    use crate::error::{ArrayError, PositionError};

    #[test]
    fn branded_push_pop() {
        with_branded(|mut array| {
            assert!(array.is_empty());
            array.push_back(1).unwrap();
            array.push_back(2).unwrap();
            assert_eq!(array.len(), 2);
            assert_eq!(array.capacity(), 4);
            assert_eq!(array.pop_back(), Ok(2));
            assert_eq!(array.pop_back(), Ok(1));
            assert_eq!(array.pop_back(), Err(ArrayError::EmptyContainer));
        })
    }

    #[test]
    fn branded_insert_erase() {
        let array = with_branded(|mut array| {
            for i in 0..4 {
                array.push_back(i).unwrap();
            }
            let pos = array.insert(array.begin() + 2, 10).unwrap();
            *array.get_mut(pos).unwrap() += 1;
            assert_eq!(array.as_slice(), &[0, 1, 11, 2, 3]);

            let next = array.erase(array.begin()).unwrap();
            assert_eq!(array.get(next), Ok(&1));
            let end = array.erase(array.end() - 1).unwrap();
            assert_eq!(end, array.end());
            assert!(matches!(
                array.get(end),
                Err(ArrayError::InvalidPosition(PositionError::OutOfBounds { .. }))
            ));
            array.into_inner()
        });
        assert_eq!(array, [1, 11, 2]);
    }

    #[cfg(feature = "generation")]
    #[test]
    fn branded_stale_position() {
        with_branded(|mut array| {
            array.push_back('a').unwrap();
            let pos = array.begin();
            array.push_back('b').unwrap();
            assert!(matches!(
                array.get(pos),
                Err(ArrayError::InvalidPosition(PositionError::Stale { .. }))
            ));
            assert_eq!(array.get(array.begin()), Ok(&'a'));
        })
    }
}
