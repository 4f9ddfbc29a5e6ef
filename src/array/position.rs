use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::sync::atomic::{self, AtomicU64};

/// Process-unique identity of one `DynArray` instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct ArrayId(u64);

impl ArrayId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ArrayId(NEXT_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// A lightweight handle to a slot of a [`DynArray`].
///
/// A `Position` is an offset, not a reference: it does not borrow the array,
/// and it is only resolved when handed back to the array that produced it
/// (see [`DynArray::at_position`], [`DynArray::insert`] and
/// [`DynArray::erase`]).
///
/// In an array with length *n* there are *n* + 1 meaningful positions,
/// `begin() + 0` to `begin() + n == end()`. Arithmetic on positions never fails;
/// an offset outside of `0..=n` is reported when the handle is used. An offset
/// that would leave the range of `isize` saturates at `isize::MAX` or
/// `isize::MIN`, which no array accepts.
///
/// A position is invalidated by every operation that may reallocate or shift
/// the storage. With `feature = "generation"` the array tracks a generation
/// counter and rejects stale handles with [`PositionError::Stale`]; without it,
/// only the array identity and the bounds are checked.
///
/// # Examples
///
/// ```
/// use dyn_array::{dyn_array, ArrayError, PositionError};
///
/// let mut array = dyn_array![1, 2, 3];
/// let pos = array.begin() + 1;
/// assert_eq!(array.at_position(pos), Ok(&2));
///
/// let pos = array.insert(pos, 99).unwrap();
/// assert_eq!(array, [1, 99, 2, 3]);
///
/// // `end()` cannot be dereferenced.
/// assert!(matches!(
///     array.at_position(array.end()),
///     Err(ArrayError::InvalidPosition(PositionError::OutOfBounds { .. }))
/// ));
/// # let _ = pos;
/// ```
///
/// [`DynArray`]: crate::DynArray
/// [`DynArray::at_position`]: crate::DynArray::at_position
/// [`DynArray::insert`]: crate::DynArray::insert
/// [`DynArray::erase`]: crate::DynArray::erase
/// [`PositionError::Stale`]: crate::PositionError::Stale
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) offset: isize,
    pub(crate) array: ArrayId,
    #[cfg(feature = "generation")]
    pub(crate) generation: u64,
}

impl Position {
    /// Returns the signed offset of the handle from the first slot.
    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Returns the offset as an index, or `None` if it is negative.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.offset).ok()
    }

    /// Returns the storage generation the handle was taken at.
    #[cfg(feature = "generation")]
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Move the handle one slot toward the tail.
    #[inline]
    pub fn advance(&mut self) {
        *self = self.shifted_forward(1);
    }

    /// Move the handle one slot toward the head.
    #[inline]
    pub fn retreat(&mut self) {
        *self = self.shifted_backward(1);
    }

    /// Returns `true` if both handles come from the same array at the same
    /// generation, which is the only case where comparing them is meaningful.
    pub fn is_comparable_with(&self, other: &Self) -> bool {
        #[cfg(feature = "generation")]
        if self.generation != other.generation {
            return false;
        }
        self.array == other.array
    }

    /// Returns the signed distance `self - other`, or `None` if the handles
    /// are not comparable.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let array = dyn_array![1, 2, 3];
    /// assert_eq!(array.end().distance(&array.begin()), Some(3));
    /// assert_eq!(array.begin().distance(&array.clone().begin()), None);
    /// ```
    pub fn distance(&self, other: &Self) -> Option<isize> {
        if !self.is_comparable_with(other) {
            return None;
        }
        self.offset.checked_sub(other.offset)
    }

    fn shifted_forward(self, n: usize) -> Self {
        let offset = isize::try_from(n)
            .ok()
            .and_then(|n| self.offset.checked_add(n))
            .unwrap_or(isize::MAX);
        Self { offset, ..self }
    }

    fn shifted_backward(self, n: usize) -> Self {
        let offset = isize::try_from(n)
            .ok()
            .and_then(|n| self.offset.checked_sub(n))
            .unwrap_or(isize::MIN);
        Self { offset, ..self }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("Position");
        f.field("offset", &self.offset);
        #[cfg(feature = "generation")]
        f.field("generation", &self.generation);
        f.finish()
    }
}

/// Handles are ordered by offset, but only when they are comparable (see
/// [`Position::is_comparable_with`]).
///
/// # Examples
///
/// ```
/// use dyn_array::dyn_array;
///
/// let array = dyn_array![1, 2, 3];
/// assert!(array.begin() < array.end());
///
/// let other = array.clone();
/// assert_eq!(array.begin().partial_cmp(&other.begin()), None);
/// ```
impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.is_comparable_with(other) {
            return None;
        }
        Some(self.offset.cmp(&other.offset))
    }
}

impl Add<usize> for Position {
    type Output = Position;

    fn add(self, rhs: usize) -> Self::Output {
        self.shifted_forward(rhs)
    }
}

impl Sub<usize> for Position {
    type Output = Position;

    fn sub(self, rhs: usize) -> Self::Output {
        self.shifted_backward(rhs)
    }
}

impl AddAssign<usize> for Position {
    fn add_assign(&mut self, rhs: usize) {
        *self = *self + rhs;
    }
}

impl SubAssign<usize> for Position {
    fn sub_assign(&mut self, rhs: usize) {
        *self = *self - rhs;
    }
}

/// The signed distance between two handles, saturating at the bounds of
/// `isize`.
///
/// Only the offsets are compared. For handles that may come from different
/// arrays or generations, use [`Position::distance`] instead.
impl Sub<Position> for Position {
    type Output = isize;

    fn sub(self, rhs: Position) -> Self::Output {
        self.offset.saturating_sub(rhs.offset)
    }
}
