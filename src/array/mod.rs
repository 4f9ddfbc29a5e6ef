use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr;
use std::slice;

use crate::array::cursor::{Cursor, CursorMut};
use crate::array::position::{ArrayId, Position};
use crate::array::raw::RawBuffer;
use crate::error::{ArrayError, PositionError};
use crate::{Drain, IntoIter, Iter, IterMut};

pub mod cursor;
pub mod iterator;
pub mod position;

mod algorithms;
pub(crate) mod raw;

/// The capacity of the first real allocation made by growth.
pub const MIN_NON_ZERO_CAP: usize = 4;

/// The factor applied to the capacity whenever growth is needed.
pub const GROWTH_FACTOR: usize = 2;

/// The `DynArray` is a growable array that stores its elements in a single
/// contiguous allocation.
///
/// It allows accessing elements at any position in *O*(1) time and appending
/// in amortized *O*(1) time. In compromise, inserting or erasing at any other
/// position takes *O*(*n*) time since the tail has to be shifted.
///
/// The `DynArray` contains:
/// - a buffer of `capacity` slots, of which the first `len` hold live elements
///   and the rest are uninitialized;
/// - the length `len`;
/// - an identity shared by every [`Position`] it hands out;
/// - a generation counter, bumped whenever the storage may have moved or
///   shifted. It can be disabled by disabling the `generation` feature in your
///   `Cargo.toml`:
/// ```text
/// [dependencies]
/// dyn_array = { default-features = false }
/// ```
///
/// # Growth
///
/// When an element has to be added to a full array, the capacity becomes
/// `max(4, capacity * 2)`. [`DynArray::reserve`] allocates exactly what is
/// asked, and never shrinks; only [`DynArray::shrink_to_fit`] does.
///
/// # Naming Conventions
///
/// - `index`: a `usize` in `0..len` (or `0..=len` where inserting is allowed);
/// - `pos`: a [`Position`] handle, resolved against the array when used.
pub struct DynArray<T> {
    buf: RawBuffer<T>,
    len: usize,
    id: ArrayId,
    #[cfg(feature = "generation")]
    generation: u64,
}

// private methods
impl<T> DynArray<T> {
    #[inline]
    fn ptr(&self) -> *mut T {
        self.buf.as_ptr()
    }

    /// Mark every outstanding [`Position`] as stale.
    #[inline]
    fn invalidate(&mut self) {
        #[cfg(feature = "generation")]
        {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub(crate) fn position_at(&self, index: usize) -> Position {
        Position {
            offset: index as isize,
            array: self.id,
            #[cfg(feature = "generation")]
            generation: self.generation,
        }
    }

    /// Resolve `pos` into an index of this array.
    ///
    /// Accepts `0..len`, or `0..=len` if `allow_end` is set.
    fn resolve(&self, pos: Position, allow_end: bool) -> Result<usize, PositionError> {
        if pos.array != self.id {
            return Err(PositionError::ForeignArray);
        }
        #[cfg(feature = "generation")]
        if pos.generation != self.generation {
            return Err(PositionError::Stale {
                taken: pos.generation,
                current: self.generation,
            });
        }
        let out_of_bounds = PositionError::OutOfBounds {
            offset: pos.offset,
            len: self.len,
        };
        let index = pos.index().ok_or(out_of_bounds)?;
        if index < self.len || (allow_end && index == self.len) {
            Ok(index)
        } else {
            Err(out_of_bounds)
        }
    }

    /// Move the live elements into a fresh buffer of exactly `new_cap` slots.
    ///
    /// On failure the array is left untouched.
    fn reallocate(&mut self, new_cap: usize) -> Result<(), ArrayError> {
        debug_assert!(new_cap >= self.len);
        let new_buf = RawBuffer::try_with_capacity(new_cap)?;
        log::trace!(
            "reallocating {} live elements from {} to {} slots",
            self.len,
            self.capacity(),
            new_cap
        );
        // SAFETY: both buffers hold at least `len` slots and are distinct
        // allocations. The old slots are treated as moved-from afterwards, and
        // releasing the old buffer runs no destructor.
        unsafe { ptr::copy_nonoverlapping(self.ptr(), new_buf.as_ptr(), self.len) };
        drop(mem::replace(&mut self.buf, new_buf));
        self.invalidate();
        Ok(())
    }

    /// Make room for at least one more element, following the growth policy.
    fn grow_one(&mut self) -> Result<(), ArrayError> {
        let doubled = self
            .capacity()
            .checked_mul(GROWTH_FACTOR)
            .ok_or(ArrayError::CapacityOverflow)?;
        self.reallocate(doubled.max(MIN_NON_ZERO_CAP))
    }

    /// Insert `value` at `index` without checking `index <= len`.
    ///
    /// It is unsafe because an `index` beyond `len` would write past the
    /// live range.
    unsafe fn insert_unchecked(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        debug_assert!(index <= self.len);
        if self.len == self.capacity() {
            // growth moves the buffer, the insertion point survives as `index`
            self.grow_one()?;
        }
        let slot = self.ptr().add(index);
        // `ptr::copy` is a memmove, so the overlapping shift does not clobber
        // the elements that are yet to be moved.
        ptr::copy(slot, slot.add(1), self.len - index);
        ptr::write(slot, value);
        self.len += 1;
        self.invalidate();
        Ok(())
    }

    /// Move the element at `index` out, shifting the tail toward the head.
    ///
    /// It is unsafe because it does not check `index < len`.
    unsafe fn remove_unchecked(&mut self, index: usize) -> T {
        debug_assert!(index < self.len);
        let slot = self.ptr().add(index);
        let value = ptr::read(slot);
        ptr::copy(slot.add(1), slot, self.len - index - 1);
        self.len -= 1;
        self.invalidate();
        value
    }

    /// Forget the live elements without dropping them. Used by `Drain`.
    pub(crate) unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        self.len = len;
        self.invalidate();
    }

    /// Give away the buffer, leaving the array empty. The caller becomes
    /// responsible for the `len` live elements it holds.
    pub(crate) fn take_buffer(&mut self) -> (RawBuffer<T>, usize) {
        let len = mem::replace(&mut self.len, 0);
        self.invalidate();
        (mem::replace(&mut self.buf, RawBuffer::new()), len)
    }
}

impl<T> DynArray<T> {
    /// Create an empty `DynArray`. Nothing is allocated until the first
    /// element is added or space is reserved.
    ///
    /// # Examples
    /// ```
    /// use dyn_array::DynArray;
    /// let array: DynArray<u32> = DynArray::new();
    /// assert_eq!(array.capacity(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
            id: ArrayId::next(),
            #[cfg(feature = "generation")]
            generation: 0,
        }
    }

    /// Create an empty `DynArray` with exactly `capacity` slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let array = DynArray::<i32>::with_capacity(10).unwrap();
    /// assert_eq!(array.len(), 0);
    /// assert_eq!(array.capacity(), 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        let mut array = Self::new();
        array.buf = RawBuffer::try_with_capacity(capacity)?;
        Ok(array)
    }

    /// Create a `DynArray` holding `len` copies of `value`, with a tight
    /// allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let array = DynArray::from_elem(3, 'x').unwrap();
    /// assert_eq!(array, ['x', 'x', 'x']);
    /// assert_eq!(array.capacity(), 3);
    /// ```
    pub fn from_elem(len: usize, value: T) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self::new();
        array.resize(len, value)?;
        Ok(array)
    }

    /// Returns the number of live elements.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the `DynArray` holds no element.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::new();
    /// assert!(array.is_empty());
    ///
    /// array.push_back("foo").unwrap();
    /// assert!(!array.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns a raw pointer to the first slot.
    ///
    /// The pointer is stable until the next reallocation, which makes it
    /// useful to observe whether an operation reallocated.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr()
    }

    /// Views the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` are live, and `ptr` is non-null and aligned even
        // when nothing is allocated.
        unsafe { slice::from_raw_parts(self.ptr(), self.len) }
    }

    /// Views the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr(), self.len) }
    }

    /// Ensure the capacity is at least `new_cap`.
    ///
    /// If `new_cap` exceeds the capacity, a buffer of exactly `new_cap` slots
    /// is allocated and the elements are moved into it. Otherwise nothing
    /// happens, and every outstanding [`Position`] stays valid.
    ///
    /// If the allocation fails, the array is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::new();
    /// array.reserve(2).unwrap();
    /// assert_eq!(array.capacity(), 2);
    ///
    /// array.push_back(5).unwrap();
    /// array.push_back(6).unwrap();
    /// assert_eq!(array.capacity(), 2);
    ///
    /// array.push_back(7).unwrap();
    /// assert_eq!(array.capacity(), 4);
    ///
    /// // never shrinks
    /// array.reserve(1).unwrap();
    /// assert_eq!(array.capacity(), 4);
    /// ```
    pub fn reserve(&mut self, new_cap: usize) -> Result<(), ArrayError> {
        if new_cap <= self.capacity() {
            return Ok(());
        }
        self.reallocate(new_cap)
    }

    /// Reduce the capacity to exactly the length. The buffer is released
    /// altogether when the array is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::with_capacity(10).unwrap();
    /// array.push_back(1).unwrap();
    /// array.shrink_to_fit().unwrap();
    /// assert_eq!(array.capacity(), 1);
    /// ```
    pub fn shrink_to_fit(&mut self) -> Result<(), ArrayError> {
        if self.capacity() == self.len {
            return Ok(());
        }
        log::debug!("shrinking from {} to {} slots", self.capacity(), self.len);
        if self.len == 0 {
            self.buf = RawBuffer::new();
            self.invalidate();
            return Ok(());
        }
        self.reallocate(self.len)
    }

    /// Append an element to the back of the array.
    ///
    /// When the array is full, the capacity grows to `max(4, capacity * 2)`
    /// first. Every outstanding [`Position`] is invalidated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in amortized *O*(1) time, and *O*(*n*)
    /// time on the step that grows the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::new();
    /// array.push_back(1).unwrap();
    /// array.push_back(2).unwrap();
    /// array.push_back(3).unwrap();
    /// assert_eq!(array, [1, 2, 3]);
    /// assert_eq!(array.capacity(), 4);
    /// ```
    pub fn push_back(&mut self, value: T) -> Result<(), ArrayError> {
        if self.len == self.capacity() {
            self.grow_one()?;
        }
        // SAFETY: `len < capacity` here, so the slot is allocated and unused.
        unsafe { ptr::write(self.ptr().add(self.len), value) };
        self.len += 1;
        self.invalidate();
        Ok(())
    }

    /// Remove the last element and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyContainer`] if the array is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::{dyn_array, ArrayError};
    ///
    /// let mut array = dyn_array![1, 3];
    /// assert_eq!(array.pop_back(), Ok(3));
    /// assert_eq!(array.pop_back(), Ok(1));
    /// assert_eq!(array.pop_back(), Err(ArrayError::EmptyContainer));
    /// ```
    pub fn pop_back(&mut self) -> Result<T, ArrayError> {
        if self.len == 0 {
            return Err(ArrayError::EmptyContainer);
        }
        self.len -= 1;
        self.invalidate();
        // SAFETY: the slot at the old `len - 1` is live and is no longer
        // counted, so it is read exactly once.
        Ok(unsafe { ptr::read(self.ptr().add(self.len)) })
    }

    /// Insert an element at `pos`, shifting the element at `pos` and
    /// everything after it toward the tail. Returns a fresh handle to the
    /// inserted element.
    ///
    /// If the array is full it grows first; the insertion point is kept by
    /// offset, so `pos` stays meaningful across the reallocation.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidPosition`] if `pos` comes from another
    /// array, is stale, or lies outside `begin()..=end()`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*len* - *index*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// let pos = array.insert(array.begin() + 1, 99).unwrap();
    /// assert_eq!(array, [1, 99, 2, 3]);
    /// assert_eq!(array.at_position(pos), Ok(&99));
    ///
    /// // inserting at `end()` is the same as `push_back`
    /// array.insert(array.end(), 4).unwrap();
    /// assert_eq!(array, [1, 99, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, pos: Position, value: T) -> Result<Position, ArrayError> {
        let index = self.resolve(pos, true)?;
        // SAFETY: `resolve` guarantees `index <= len`.
        unsafe { self.insert_unchecked(index, value)? };
        Ok(self.position_at(index))
    }

    /// Erase the element at `pos`, shifting everything after it toward the
    /// head. Returns a handle to the element that took its place, which is
    /// `end()` if the last element was erased.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidPosition`] if `pos` comes from another
    /// array, is stale, or lies outside `begin()..end()`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*len* - *index*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 99, 2, 3];
    /// let pos = array.erase(array.begin() + 2).unwrap();
    /// assert_eq!(array, [1, 99, 3]);
    /// assert_eq!(array.at_position(pos), Ok(&3));
    ///
    /// let pos = array.erase(array.end() - 1).unwrap();
    /// assert_eq!(pos, array.end());
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<Position, ArrayError> {
        let index = self.resolve(pos, false)?;
        // SAFETY: `resolve` guarantees `index < len`.
        drop(unsafe { self.remove_unchecked(index) });
        Ok(self.position_at(index))
    }

    /// Insert an element at `index`, shifting everything after it toward the
    /// tail. `index == len` appends.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// array.insert_at(2, 4).unwrap();
    /// array.insert_at(4, 5).unwrap();
    /// assert_eq!(array, [1, 2, 4, 3, 5]);
    /// assert!(array.insert_at(7, 6).is_err());
    /// ```
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        if index > self.len {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        // SAFETY: checked above.
        unsafe { self.insert_unchecked(index, value) }
    }

    /// Remove the element at `index` and return it, shifting everything after
    /// it toward the head.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![3, 2, 1];
    /// assert_eq!(array.remove(1), Ok(2));
    /// assert_eq!(array.remove(0), Ok(3));
    /// assert_eq!(array.remove(0), Ok(1));
    /// assert!(array.remove(0).is_err());
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        // SAFETY: checked above.
        Ok(unsafe { self.remove_unchecked(index) })
    }

    /// Shorten the array to `len` elements, dropping the rest. Does nothing if
    /// `len` is not smaller than the current length. The capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        // SAFETY: `[len, self.len)` are live. The length is updated first, so
        // a panicking destructor cannot lead to a double drop.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.ptr().add(len), self.len - len);
            self.len = len;
            self.invalidate();
            ptr::drop_in_place(tail);
        }
    }

    /// Resize the array to `new_len` elements.
    ///
    /// Shrinking drops the tail and keeps the capacity. Growing reserves
    /// exactly `new_len` slots if needed, then appends copies of `fill`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// array.resize(5, 0).unwrap();
    /// assert_eq!(array, [1, 2, 3, 0, 0]);
    /// assert_eq!(array.capacity(), 5);
    ///
    /// array.resize(2, 0).unwrap();
    /// assert_eq!(array, [1, 2]);
    /// assert_eq!(array.capacity(), 5);
    /// ```
    pub fn resize(&mut self, new_len: usize, fill: T) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        match new_len.cmp(&self.len) {
            Ordering::Less => self.truncate(new_len),
            Ordering::Equal => {}
            Ordering::Greater => {
                self.reserve(new_len)?;
                for _ in self.len + 1..new_len {
                    self.push_back(fill.clone())?;
                }
                self.push_back(fill)?;
            }
        }
        Ok(())
    }

    /// Like [`DynArray::resize`], but new elements are produced by `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::new();
    /// let mut next = 0;
    /// array.resize_with(4, || { next += 2; next }).unwrap();
    /// assert_eq!(array, [2, 4, 6, 8]);
    /// ```
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<(), ArrayError>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;
        while self.len < new_len {
            self.push_back(f())?;
        }
        Ok(())
    }

    /// Drop every element. The capacity is kept for reuse.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// array.clear();
    /// assert!(array.is_empty());
    /// assert_eq!(array.capacity(), 3);
    /// ```
    pub fn clear(&mut self) {
        self.truncate(0);
        self.invalidate();
    }

    /// Exchange the storage of two arrays in *O*(1) time.
    ///
    /// Positions of both arrays are invalidated, since the storage they were
    /// taken from now belongs to the other array.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut a = dyn_array![1, 2];
    /// let mut b = dyn_array![3];
    /// a.swap(&mut b);
    /// assert_eq!(a, [3]);
    /// assert_eq!(b, [1, 2]);
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buf, &mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
        self.invalidate();
        other.invalidate();
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::{dyn_array, ArrayError};
    ///
    /// let array = dyn_array![10, 20];
    /// assert_eq!(array.at(1), Ok(&20));
    /// assert_eq!(array.at(2), Err(ArrayError::IndexOutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ArrayError::IndexOutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrayError::IndexOutOfRange { index, len })
    }

    /// Returns a reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyContainer`] if the array is empty.
    pub fn front(&self) -> Result<&T, ArrayError> {
        self.as_slice().first().ok_or(ArrayError::EmptyContainer)
    }

    /// Returns a mutable reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyContainer`] if the array is empty.
    pub fn front_mut(&mut self) -> Result<&mut T, ArrayError> {
        self.as_mut_slice()
            .first_mut()
            .ok_or(ArrayError::EmptyContainer)
    }

    /// Returns a reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyContainer`] if the array is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::{ArrayError, DynArray};
    ///
    /// let mut array = DynArray::new();
    /// assert_eq!(array.back(), Err(ArrayError::EmptyContainer));
    ///
    /// array.push_back(1).unwrap();
    /// assert_eq!(array.back(), Ok(&1));
    /// ```
    pub fn back(&self) -> Result<&T, ArrayError> {
        self.as_slice().last().ok_or(ArrayError::EmptyContainer)
    }

    /// Returns a mutable reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyContainer`] if the array is empty.
    pub fn back_mut(&mut self) -> Result<&mut T, ArrayError> {
        self.as_mut_slice()
            .last_mut()
            .ok_or(ArrayError::EmptyContainer)
    }

    /// Returns a handle to the first slot.
    #[inline]
    pub fn begin(&self) -> Position {
        self.position_at(0)
    }

    /// Returns a handle one past the last live element.
    #[inline]
    pub fn end(&self) -> Position {
        self.position_at(self.len)
    }

    /// Returns a reference to the element at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidPosition`] if `pos` comes from another
    /// array, is stale, or is not in `begin()..end()`.
    pub fn at_position(&self, pos: Position) -> Result<&T, ArrayError> {
        let index = self.resolve(pos, false)?;
        Ok(&self.as_slice()[index])
    }

    /// Returns a mutable reference to the element at `pos`.
    ///
    /// # Errors
    ///
    /// See [`DynArray::at_position`].
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// let pos = array.end() - 1;
    /// *array.at_position_mut(pos).unwrap() *= 10;
    /// assert_eq!(array, [1, 2, 30]);
    /// ```
    pub fn at_position_mut(&mut self, pos: Position) -> Result<&mut T, ArrayError> {
        let index = self.resolve(pos, false)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Returns `true` if `pos` can still be used with this array, i.e. it was
    /// handed out by this array, is not stale, and lies in `begin()..=end()`.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        self.resolve(pos, true).is_ok()
    }

    /// Provides a cursor at the given index.
    ///
    /// By convention, the cursor is past the last element if `at == len`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] if `at > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let array = dyn_array![1, 2, 3];
    /// assert_eq!(array.cursor(1).unwrap().current(), Some(&2));
    /// assert_eq!(array.cursor(3).unwrap().current(), None);
    /// assert!(array.cursor(4).is_err());
    /// ```
    pub fn cursor(&self, at: usize) -> Result<Cursor<'_, T>, ArrayError> {
        if at > self.len {
            return Err(ArrayError::IndexOutOfRange {
                index: at,
                len: self.len,
            });
        }
        Ok(Cursor::new(self, at))
    }

    /// Provides a cursor at the first element.
    pub fn cursor_start(&self) -> Cursor<'_, T> {
        Cursor::new(self, 0)
    }

    /// Provides a cursor past the last element.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let array = dyn_array![1, 2, 3];
    /// let cursor = array.cursor_end();
    /// assert_eq!(cursor.current(), None);
    /// assert_eq!(cursor.previous(), Some(&3));
    /// ```
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.len)
    }

    /// Provides a cursor with editing operations at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] if `at > len`.
    pub fn cursor_mut(&mut self, at: usize) -> Result<CursorMut<'_, T>, ArrayError> {
        if at > self.len {
            return Err(ArrayError::IndexOutOfRange {
                index: at,
                len: self.len,
            });
        }
        Ok(CursorMut::new(self, at))
    }

    /// Provides a cursor with editing operations at the first element.
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, 0)
    }

    /// Provides a cursor with editing operations past the last element.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        let len = self.len;
        CursorMut::new(self, len)
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let array = dyn_array![0, 1, 2];
    /// let mut iter = array.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_slice())
    }

    /// Provides a forward iterator with mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![0, 1, 2];
    /// for element in array.iter_mut() {
    ///     *element += 10;
    /// }
    /// assert_eq!(array, [10, 11, 12]);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.as_mut_slice())
    }

    /// Remove every element as an iterator, keeping the capacity.
    ///
    /// Elements not consumed by the iterator are dropped when it is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// let drained: Vec<_> = array.drain().collect();
    /// assert_eq!(drained, vec![1, 2, 3]);
    /// assert!(array.is_empty());
    /// assert_eq!(array.capacity(), 3);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(self)
    }

    /// Deep copy the array into a tight allocation, reporting allocation
    /// failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(self.len)?;
        for elem in self.iter() {
            array.push_back(elem.clone())?;
        }
        Ok(array)
    }
}

impl<T: Debug> Debug for DynArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// # Panics
///
/// Panics if `index >= len`. Use [`DynArray::at`] for the checked form.
impl<T> Index<usize> for DynArray<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{}", err),
        }
    }
}

/// # Panics
///
/// Panics if `index >= len`. Use [`DynArray::at_mut`] for the checked form.
impl<T> IndexMut<usize> for DynArray<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` are live and dropped exactly once here; the
        // buffer itself is released by `RawBuffer`'s destructor afterwards.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

unsafe impl<T: Send> Send for DynArray<T> {}

unsafe impl<T: Sync> Sync for DynArray<T> {}

// Ensure that `DynArray` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: DynArray<&'static str>) -> DynArray<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}
