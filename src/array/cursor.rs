use crate::array::position::Position;
use crate::array::DynArray;
use crate::error::{ArrayError, PositionError};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Formatter;

/// A cursor over a `DynArray`.
///
/// A `Cursor` is like an iterator, except that it can freely seek back-and-forth.
/// It borrows the array, so unlike a [`Position`] it can never observe a
/// reallocation.
///
/// In an array with length *n*, there are *n* + 1 valid locations for the cursor,
/// indexed by 0, 1, ..., *n*, where *n* is past the last element.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The location past
/// the last element is denoted by `#`).
/// ```
/// use dyn_array::dyn_array;
///
/// // Create an array: [ A B C D #]
/// let array = dyn_array!['A', 'B', 'C', 'D'];
///
/// // Create a cursor at start: [|A B C D #] (index = 0)
/// let mut cursor = array.cursor_start();
/// assert_eq!(cursor.current(), Some(&'A'));
///
/// // Move cursor forward: [ A|B C D #] (index = 1)
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.current(), Some(&'B'));
///
/// // Create a cursor in the end: [ A B C D|#] (index = 4)
/// let mut cursor = array.cursor_end();
/// assert_eq!(cursor.current(), None);
/// assert!(cursor.move_next().is_err());
///
/// // Move cursor backward: [ A B C|D #] (index = 3)
/// assert!(cursor.move_prev().is_ok());
/// assert_eq!(cursor.current(), Some(&'D'));
/// ```
pub struct Cursor<'a, T: 'a> {
    index: usize,
    array: &'a DynArray<T>,
}

impl<'a, T: 'a> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            array: self.array,
        }
    }
}

/// Compare cursors by their locations.
///
/// Only cursors belonging to the same array and at the same index
/// are considered equal.
///
/// # Examples
/// ```
/// use dyn_array::dyn_array;
///
/// let array = dyn_array![1, 2, 3];
/// let cursor1 = array.cursor_start();
/// let mut cursor2 = cursor1.clone();
/// assert_eq!(cursor1, cursor2);
///
/// cursor2.move_next().unwrap();
/// assert_ne!(cursor1, cursor2);
/// assert!(cursor1 < cursor2);
///
/// let another_array = array.clone();
/// let cursor3 = another_array.cursor_start();
/// assert_ne!(cursor1, cursor3);
/// assert_eq!(cursor1.partial_cmp(&cursor3), None);
/// ```
impl<'a, T: 'a> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_array_with(other) && self.index == other.index
    }
}

impl<'a, T: 'a> Eq for Cursor<'a, T> {}

impl<'a, T: 'a> PartialOrd for Cursor<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_array_with(other) {
            return None;
        }
        Some(self.index.cmp(&other.index))
    }
}

/// A cursor over a `DynArray` with editing operations.
///
/// A `CursorMut` is like an iterator, except that it can freely seek back-and-forth,
/// and can safely mutate the array during iteration. This is because the lifetime
/// of its yielded references is tied to its own lifetime, instead of just the
/// underlying array. This means cursors cannot yield multiple elements at once.
///
/// For convenience, [`CursorMut::view`] temporarily borrows the array through
/// the cursor.
///
/// # Examples
///
/// ```compile_fail
/// use dyn_array::dyn_array;
///
/// let mut array = dyn_array![1, 2, 3];
/// let mut cursor = array.cursor_start_mut();
/// println!("{:?}", array.back());
/// println!("{:?}", cursor.current());
/// ```
pub struct CursorMut<'a, T: 'a> {
    index: usize,
    array: &'a mut DynArray<T>,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        // Private methods
        impl<'a, T: 'a> $CURSOR<'a, T> {
            fn out_of_bounds(&self, offset: isize) -> ArrayError {
                PositionError::OutOfBounds {
                    offset,
                    len: self.array.len(),
                }
                .into()
            }
        }

        impl<'a, T: 'a> $CURSOR<'a, T> {
            /// Return the index of the cursor.
            #[inline]
            pub fn index(&self) -> usize {
                self.index
            }

            /// Returns the length of the array. See [`DynArray::len`].
            #[inline]
            pub fn len(&self) -> usize {
                self.array.len()
            }

            /// Returns `true` if the array is empty. See [`DynArray::is_empty`].
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.array.is_empty()
            }

            /// Returns a [`Position`] handle for the cursor location, valid
            /// until the array is next modified.
            ///
            /// # Examples
            ///
            /// ```
            /// use dyn_array::dyn_array;
            ///
            /// let array = dyn_array![1, 2, 3];
            /// let pos = array.cursor(2).unwrap().position();
            /// assert_eq!(pos, array.begin() + 2);
            /// assert_eq!(array.at_position(pos), Ok(&3));
            /// ```
            pub fn position(&self) -> Position {
                self.array.position_at(self.index)
            }

            /// Move the cursor to the next location, or return an error
            /// if it is already past the last element.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Examples
            ///
            /// ```
            /// use dyn_array::dyn_array;
            ///
            /// let array = dyn_array![1, 2, 3];
            /// let mut cursor = array.cursor_end();
            ///
            /// assert!(cursor.move_next().is_err());
            ///
            /// // the cursor is still past the last element
            /// assert_eq!(cursor.previous(), Some(&3));
            /// ```
            pub fn move_next(&mut self) -> Result<(), ArrayError> {
                if self.index >= self.array.len() {
                    return Err(self.out_of_bounds(self.index as isize + 1));
                }
                self.index += 1;
                Ok(())
            }

            /// Move the cursor to the previous location, or return an error
            /// if it is already at the first element.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Examples
            ///
            /// ```
            /// use dyn_array::dyn_array;
            ///
            /// let array = dyn_array![1, 2, 3];
            /// let mut cursor = array.cursor_start();
            ///
            /// assert!(cursor.move_prev().is_err());
            ///
            /// // The cursor is still at the first element
            /// assert_eq!(cursor.current(), Some(&1));
            /// ```
            pub fn move_prev(&mut self) -> Result<(), ArrayError> {
                if self.index == 0 {
                    return Err(self.out_of_bounds(-1));
                }
                self.index -= 1;
                Ok(())
            }

            /// Move forward the cursor by given steps, or return an error
            /// if it would pass the end.
            ///
            /// If an error occurs, the cursor stays put.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Examples
            ///
            /// ```
            /// use dyn_array::dyn_array;
            ///
            /// let array = dyn_array![1, 2, 3];
            /// let mut cursor = array.cursor_start();
            ///
            /// assert!(cursor.seek_forward(5).is_err());
            /// assert_eq!(cursor.current(), Some(&1));
            ///
            /// assert!(cursor.seek_forward(3).is_ok());
            /// assert_eq!(cursor.previous(), Some(&3));
            /// ```
            pub fn seek_forward(&mut self, steps: usize) -> Result<(), ArrayError> {
                match self.index.checked_add(steps) {
                    Some(target) if target <= self.array.len() => {
                        self.index = target;
                        Ok(())
                    }
                    _ => Err(self.out_of_bounds(
                        (self.index as isize).saturating_add_unsigned(steps),
                    )),
                }
            }

            /// Move backward the cursor by given steps, or return an error
            /// if it would pass the first element.
            ///
            /// If an error occurs, the cursor stays put.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Examples
            ///
            /// ```
            /// use dyn_array::dyn_array;
            ///
            /// let array = dyn_array![1, 2, 3];
            /// let mut cursor = array.cursor_end();
            ///
            /// assert!(cursor.seek_backward(5).is_err());
            /// assert_eq!(cursor.previous(), Some(&3));
            ///
            /// assert!(cursor.seek_backward(3).is_ok());
            /// assert_eq!(cursor.current(), Some(&1));
            /// ```
            pub fn seek_backward(&mut self, steps: usize) -> Result<(), ArrayError> {
                match self.index.checked_sub(steps) {
                    Some(target) => {
                        self.index = target;
                        Ok(())
                    }
                    None => Err(self.out_of_bounds(
                        (self.index as isize).saturating_sub_unsigned(steps),
                    )),
                }
            }

            /// Move the cursor to the given location `target`, or return an error
            /// when `target > len`.
            ///
            /// If an error occurs, the cursor stays put.
            ///
            /// # Examples
            ///
            /// ```
            /// use dyn_array::dyn_array;
            ///
            /// let array = dyn_array![1, 2, 3];
            /// let mut cursor = array.cursor_start();
            ///
            /// assert!(cursor.seek_to(2).is_ok());
            /// assert_eq!(cursor.current(), Some(&3));
            ///
            /// // Forbid to move to an invalid place
            /// assert!(cursor.seek_to(5).is_err());
            /// assert_eq!(cursor.current(), Some(&3));
            /// ```
            pub fn seek_to(&mut self, target: usize) -> Result<(), ArrayError> {
                if target > self.array.len() {
                    return Err(self.out_of_bounds(target as isize));
                }
                self.index = target;
                Ok(())
            }

            /// Set the cursor to the first element.
            #[inline]
            pub fn move_to_start(&mut self) {
                self.index = 0;
            }

            /// Set the cursor past the last element.
            ///
            /// # Examples
            ///
            /// ```
            /// use dyn_array::dyn_array;
            ///
            /// let array = dyn_array![1, 2, 3];
            /// let mut cursor = array.cursor_start();
            /// cursor.move_to_end();
            /// assert_eq!(cursor.current(), None);
            /// assert_eq!(cursor.previous(), Some(&3));
            /// ```
            #[inline]
            pub fn move_to_end(&mut self) {
                self.index = self.array.len();
            }
        }

        impl<'a, T: fmt::Debug + 'a> fmt::Debug for $CURSOR<'a, T> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($CURSOR))
                    .field("array", &self.array)
                    .field("current", &self.array.as_slice().get(self.index))
                    .field("index", &self.index)
                    .finish()
            }
        }
    };
}

impl_cursor!(CursorMut);
impl_cursor!(Cursor);

impl<'a, T: 'a> Cursor<'a, T> {
    pub(crate) fn new(array: &'a DynArray<T>, index: usize) -> Self {
        debug_assert!(index <= array.len());
        Self { index, array }
    }

    fn same_array_with(&self, other: &Self) -> bool {
        std::ptr::eq(self.array, other.array)
    }

    /// Return an immutable reference to the element at the cursor,
    /// or `None` if the cursor is past the last element.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let array = dyn_array![1, 2, 3];
    /// assert_eq!(array.cursor(0).unwrap().current(), Some(&1));
    /// assert_eq!(array.cursor(2).unwrap().current(), Some(&3));
    /// assert_eq!(array.cursor(3).unwrap().current(), None);
    /// ```
    pub fn current(&self) -> Option<&'a T> {
        self.array.as_slice().get(self.index)
    }

    /// Return an immutable reference to the element before the cursor,
    /// or `None` if the cursor is at the first element.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let array = dyn_array![1, 2, 3];
    /// assert_eq!(array.cursor(0).unwrap().previous(), None);
    /// assert_eq!(array.cursor(1).unwrap().previous(), Some(&1));
    /// assert_eq!(array.cursor(3).unwrap().previous(), Some(&3));
    /// ```
    pub fn previous(&self) -> Option<&'a T> {
        let index = self.index.checked_sub(1)?;
        self.array.as_slice().get(index)
    }
}

impl<'a, T: 'a> CursorMut<'a, T> {
    pub(crate) fn new(array: &'a mut DynArray<T>, index: usize) -> Self {
        debug_assert!(index <= array.len());
        Self { index, array }
    }

    /// Return an immutable reference to the element at the cursor,
    /// or `None` if the cursor is past the last element.
    pub fn current(&self) -> Option<&T> {
        self.array.as_slice().get(self.index)
    }

    /// Return an immutable reference to the element before the cursor,
    /// or `None` if the cursor is at the first element.
    pub fn previous(&self) -> Option<&T> {
        let index = self.index.checked_sub(1)?;
        self.array.as_slice().get(index)
    }

    /// Return a mutable reference to the element at the cursor,
    /// or `None` if the cursor is past the last element.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    ///
    /// let mut cursor = array.cursor_mut(0).unwrap();
    /// *cursor.current_mut().unwrap() *= 5;
    /// assert_eq!(cursor.current(), Some(&5));
    ///
    /// assert!(array.cursor_mut(3).unwrap().current_mut().is_none());
    /// ```
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.array.as_mut_slice().get_mut(self.index)
    }

    /// Return a mutable reference to the element before the cursor,
    /// or `None` if the cursor is at the first element.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    ///
    /// let mut cursor = array.cursor_mut(3).unwrap();
    /// *cursor.previous_mut().unwrap() *= 5;
    /// assert_eq!(cursor.previous(), Some(&15));
    ///
    /// assert!(array.cursor_mut(0).unwrap().previous_mut().is_none());
    /// ```
    pub fn previous_mut(&mut self) -> Option<&mut T> {
        let index = self.index.checked_sub(1)?;
        self.array.as_mut_slice().get_mut(index)
    }

    /// Re-borrow the mutable cursor as a short-lived immutable one.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.array, self.index)
    }

    /// Convert the mutable cursor to an immutable one.
    pub fn into_cursor(self) -> Cursor<'a, T> {
        Cursor::new(self.array, self.index)
    }

    /// Temporarily view the array via an immutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// let mut cursor = array.cursor_start_mut();
    ///
    /// assert_eq!(cursor.view().back(), Ok(&3));
    ///
    /// cursor.insert(4).unwrap();
    /// assert_eq!(array, [4, 1, 2, 3]);
    /// ```
    pub fn view(&self) -> &DynArray<T> {
        self.array
    }

    /// Add an element before the cursor location.
    ///
    /// After insertion the cursor still points at the same element, so its
    /// `index` becomes `index + 1`.
    ///
    /// This operation should compute in *O*(*len* - *index*) time.
    ///
    /// # Errors
    ///
    /// Growing the array may fail, in which case nothing is inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::dyn_array;
    ///
    /// let mut array = dyn_array![1, 2, 3];
    /// let mut cursor = array.cursor_mut(1).unwrap();
    ///
    /// cursor.insert(4).unwrap(); // becomes [1, 4, 2, 3]
    /// assert_eq!(cursor.index(), 2);
    /// assert_eq!(cursor.current(), Some(&2));
    ///
    /// cursor.move_to_end();
    /// cursor.insert(5).unwrap(); // becomes [1, 4, 2, 3, 5]
    /// assert_eq!(cursor.index(), 5);
    /// assert_eq!(cursor.previous(), Some(&5));
    ///
    /// assert_eq!(array, [1, 4, 2, 3, 5]);
    /// ```
    pub fn insert(&mut self, item: T) -> Result<(), ArrayError> {
        self.array.insert_at(self.index, item)?;
        self.index += 1;
        Ok(())
    }

    /// Remove the element at the cursor and return it, or return `None`
    /// if the cursor is past the last element. After removal the cursor
    /// points at the element that followed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::from_iter(0..10);
    /// let mut cursor = array.cursor_mut(5).unwrap();
    ///
    /// assert_eq!(cursor.remove(), Some(5)); // becomes [0, 1, 2, 3, 4, 6, 7, 8, 9]
    /// assert_eq!(cursor.index(), 5);
    /// assert_eq!(cursor.current(), Some(&6));
    ///
    /// cursor.move_to_end();
    /// assert_eq!(cursor.remove(), None);
    /// assert_eq!(cursor.index(), 9);
    ///
    /// assert_eq!(array, [0, 1, 2, 3, 4, 6, 7, 8, 9]);
    /// ```
    pub fn remove(&mut self) -> Option<T> {
        self.array.remove(self.index).ok()
    }

    /// Remove the element before the cursor and return it, or return `None`
    /// if the cursor is at the first element. After removal the cursor still
    /// points at the same element, so its `index` becomes `index - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::from_iter(0..10);
    /// let mut cursor = array.cursor_mut(5).unwrap();
    ///
    /// assert_eq!(cursor.backspace(), Some(4)); // becomes [0, 1, 2, 3, 5, 6, 7, 8, 9]
    /// assert_eq!(cursor.index(), 4);
    /// assert_eq!(cursor.current(), Some(&5));
    ///
    /// cursor.move_to_start();
    /// assert_eq!(cursor.backspace(), None);
    /// assert_eq!(cursor.current(), Some(&0));
    /// ```
    pub fn backspace(&mut self) -> Option<T> {
        self.move_prev().ok().and_then(|_| self.remove())
    }
}

impl<'a, T: 'a> From<CursorMut<'a, T>> for Cursor<'a, T> {
    fn from(cursor: CursorMut<'a, T>) -> Self {
        cursor.into_cursor()
    }
}

#[cfg(test)]
mod tests {
    use crate::array::DynArray;
    use crate::error::{ArrayError, PositionError};

    #[test]
    fn cursor_walk() {
        let array = DynArray::from_iter(0..5);
        let mut cursor = array.cursor_start();
        let mut seen = Vec::new();
        while let Some(&x) = cursor.current() {
            seen.push(x);
            cursor.move_next().unwrap();
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(cursor.index(), cursor.len());

        let mut seen = Vec::new();
        while let Some(&x) = cursor.previous() {
            seen.push(x);
            cursor.move_prev().unwrap();
        }
        assert_eq!(seen, vec![4, 3, 2, 1, 0]);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn cursor_empty() {
        let mut array = DynArray::<i32>::new();
        let mut cursor = array.cursor_start();
        assert!(cursor.is_empty());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.previous(), None);
        assert!(cursor.move_next().is_err());
        assert!(cursor.move_prev().is_err());
        assert_eq!(cursor, array.cursor_end());

        let mut cursor = array.cursor_start_mut();
        assert_eq!(cursor.remove(), None);
        assert_eq!(cursor.backspace(), None);
        cursor.insert(1).unwrap();
        assert_eq!(cursor.index(), 1);
        assert_eq!(array, [1]);
    }

    #[test]
    fn cursor_errors_leave_cursor_in_place() {
        let array = DynArray::from_iter([1, 2, 3]);
        let mut cursor = array.cursor(1).unwrap();
        assert_eq!(
            cursor.seek_forward(3),
            Err(ArrayError::InvalidPosition(PositionError::OutOfBounds {
                offset: 4,
                len: 3
            }))
        );
        assert_eq!(cursor.index(), 1);
        assert_eq!(
            cursor.seek_backward(2),
            Err(ArrayError::InvalidPosition(PositionError::OutOfBounds {
                offset: -1,
                len: 3
            }))
        );
        assert_eq!(cursor.index(), 1);
        assert!(cursor.seek_to(4).is_err());
        assert_eq!(cursor.index(), 1);
        assert_eq!(
            array.cursor(4).err(),
            Some(ArrayError::IndexOutOfRange { index: 4, len: 3 })
        );
    }

    #[test]
    fn cursor_position_round_trip() {
        let mut array = DynArray::from_iter([10, 20, 30]);
        let pos = array.cursor(1).unwrap().position();
        let pos = array.insert(pos, 15).unwrap();
        assert_eq!(array, [10, 15, 20, 30]);
        let mut cursor = array.cursor_mut(pos.index().unwrap()).unwrap();
        assert_eq!(cursor.current(), Some(&15));
        assert_eq!(cursor.remove(), Some(15));
        assert_eq!(cursor.position().index(), Some(1));
        assert_eq!(cursor.view(), &[10, 20, 30]);
    }

    #[test]
    fn cursor_mut_edit_all() {
        let mut array = DynArray::from_iter(1..=6);
        let mut cursor = array.cursor_start_mut();
        // drop the even elements and double the odd ones
        while let Some(x) = cursor.current_mut() {
            if *x % 2 == 0 {
                cursor.remove();
            } else {
                *x *= 2;
                cursor.move_next().unwrap();
            }
        }
        assert_eq!(cursor.as_cursor().previous(), Some(&10));
        let cursor = cursor.into_cursor();
        assert_eq!(cursor.index(), 3);
        assert_eq!(array, [2, 6, 10]);
    }

    #[test]
    fn cursor_mut_insert_grows() {
        let mut array = DynArray::new();
        let mut cursor = array.cursor_end_mut();
        for i in 0..10 {
            cursor.insert(i).unwrap();
            cursor.move_prev().unwrap();
        }
        assert_eq!(cursor.index(), 0);
        assert_eq!(array, DynArray::from_iter((0..10).rev()));
        assert_eq!(array.capacity(), 16);
    }
}
