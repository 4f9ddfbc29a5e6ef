use crate::array::raw::{handle_alloc_result, RawBuffer};
use crate::array::DynArray;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::ptr;
use std::slice;

/// An iterator over the elements of a `DynArray`.
///
/// # Examples
///
/// ```compile_fail
/// use dyn_array::dyn_array;
///
/// let mut array = dyn_array![1, 2, 3];
/// let mut iter = array.iter();
///
/// // Won't compile, because array is already borrowed immutably.
/// array.push_back(4).unwrap();
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a, T: 'a> {
    inner: slice::Iter<'a, T>,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(slice: &'a [T]) -> Self {
        Self {
            inner: slice.iter(),
        }
    }

    /// Views the elements not yet yielded.
    pub fn as_slice(&self) -> &'a [T] {
        self.inner.as_slice()
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// A mutable iterator over the elements of a `DynArray`.
///
/// # Examples
///
/// ```compile_fail
/// use dyn_array::dyn_array;
///
/// let mut array = dyn_array![1, 2, 3];
/// let mut iter = array.iter_mut();
///
/// // Won't compile, because array is already borrowed mutably.
/// println!("{:?}", array.len());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a, T: 'a> {
    inner: slice::IterMut<'a, T>,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        Self {
            inner: slice.iter_mut(),
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.inner.as_slice()).finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

/// An owning iterator over the elements of a `DynArray`.
///
/// This `struct` is created by the [`into_iter`] method on [`DynArray`]
/// (provided by the `IntoIterator` trait). It owns the buffer, and the slots
/// `start..end` are the elements not yet yielded.
///
/// [`into_iter`]: DynArray::into_iter
pub struct IntoIter<T> {
    buf: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Views the elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `start..end` are live and owned by the iterator.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: the slot at `start` is live, and is excluded from the live
        // range right after being read.
        let item = unsafe { ptr::read(self.buf.as_ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot at the old `end - 1` is live, and is no longer
        // part of the live range.
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: the remaining elements are dropped exactly once, then the
        // buffer is released by `RawBuffer`.
        unsafe {
            let remaining = ptr::slice_from_raw_parts_mut(
                self.buf.as_ptr().add(self.start),
                self.end - self.start,
            );
            ptr::drop_in_place(remaining)
        }
    }
}

/// A draining iterator over the elements of a `DynArray`.
///
/// This `struct` is created by [`DynArray::drain`]. The array is emptied as
/// soon as the `Drain` is created; elements not yielded are dropped when the
/// `Drain` is dropped. The capacity is kept.
///
/// If the `Drain` is leaked, the array stays empty and the remaining elements
/// are leaked with it.
pub struct Drain<'a, T: 'a> {
    array: &'a mut DynArray<T>,
    start: usize,
    end: usize,
}

impl<'a, T: 'a> Drain<'a, T> {
    pub(crate) fn new(array: &'a mut DynArray<T>) -> Self {
        let end = array.len();
        // SAFETY: the elements `0..end` are now owned by the `Drain`.
        unsafe { array.set_len(0) };
        Self {
            array,
            start: 0,
            end,
        }
    }

    fn remaining(&self) -> &[T] {
        // SAFETY: `start..end` are live and owned by the `Drain`.
        unsafe { slice::from_raw_parts(self.array.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: see `IntoIter::next`.
        let item = unsafe { ptr::read(self.array.ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Drain<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: see `IntoIter::next_back`.
        Some(unsafe { ptr::read(self.array.ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the array no longer counts these elements as live.
        unsafe {
            let remaining = ptr::slice_from_raw_parts_mut(
                self.array.ptr().add(self.start),
                self.end - self.start,
            );
            ptr::drop_in_place(remaining)
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Drain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Drain").field(&self.remaining()).finish()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let (buf, len) = self.take_buffer();
        IntoIter {
            buf,
            start: 0,
            end: len,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// # Panics
///
/// Panics if the array grows beyond `isize::MAX` bytes, and aborts if the
/// allocator fails. Use [`DynArray::push_back`] to observe these failures
/// instead.
impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = DynArray::new();
        // exact-size sources end up with a tight allocation
        handle_alloc_result(array.reserve(iter.size_hint().0));
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter()
            .for_each(|item| handle_alloc_result(self.push_back(item)));
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use crate::array::DynArray;
    use std::cell::RefCell;
    use std::fmt::Debug;
    use std::iter::FromIterator;

    #[test]
    fn test_iter() {
        macro_rules! test_iter {
            ($FN:ident, $ITER:ident $(, $REV:ident)?) => {
                fn $FN<T, I>(input: I, mid: usize)
                where
                    T: Eq + Debug + Clone,
                    I: IntoIterator<Item = T>,
                {
                    #[allow(unused_mut)]
                    let mut vec = Vec::from_iter(input);
                    #[allow(unused_mut)]
                    let mut array = DynArray::from_iter(vec.clone());
                    let len = vec.len();
                    let mut iter = array.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )?.enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);

                    let mut iter = array.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )? .take(mid).enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    let mut iter = iter.rev();
                    for (i, item) in vec.$ITER() $( .$REV() )? .skip(mid).rev().enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - mid - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);
                }
            };
        }
        test_iter!(test_iter, iter);
        test_iter!(test_iter_mut, iter_mut);
        test_iter!(test_back_iter, iter, rev);
        test_iter!(test_back_iter_mut, iter_mut, rev);

        fn test_case<T, I>(input: I, mid: usize)
        where
            T: Eq + Debug + Clone,
            I: IntoIterator<Item = T> + Clone,
        {
            test_iter(input.clone(), mid);
            test_iter_mut(input.clone(), mid);
            test_back_iter(input.clone(), mid);
            test_back_iter_mut(input.clone(), mid);
        }
        test_case(0..10, 10);
        test_case(0..10, 8);
        test_case(0..10, 5);
        test_case(0..10, 0);
        test_case(0..2, 1);
        test_case(0..1, 1);
        test_case(0..0, 0);
    }

    #[test]
    fn test_into_iter() {
        let array = DynArray::from_iter(["a", "b", "c", "d"].map(String::from));
        let mut iter = array.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next().as_deref(), Some("a"));
        assert_eq!(iter.next_back().as_deref(), Some("d"));
        assert_eq!(iter.as_slice(), ["b", "c"]);
        assert_eq!(iter.len(), 2);
        // the rest is dropped with the iterator
    }

    #[test]
    fn test_into_iter_drops_rest() {
        let dropped = RefCell::new(Vec::new());
        struct Noisy<'a>(i32, &'a RefCell<Vec<i32>>);
        impl Drop for Noisy<'_> {
            fn drop(&mut self) {
                self.1.borrow_mut().push(self.0);
            }
        }
        let array = DynArray::from_iter((0..5).map(|i| Noisy(i, &dropped)));
        let mut iter = array.into_iter();
        drop(iter.next());
        drop(iter.next_back());
        assert_eq!(dropped.borrow().as_slice(), &[0, 4]);
        drop(iter);
        assert_eq!(dropped.borrow().as_slice(), &[0, 4, 1, 2, 3]);
    }

    #[test]
    fn test_drain() {
        let mut array = DynArray::from_iter(0..6);
        let capacity = array.capacity();
        {
            let mut drain = array.drain();
            assert_eq!(drain.len(), 6);
            assert_eq!(drain.next(), Some(0));
            assert_eq!(drain.next_back(), Some(5));
            assert_eq!(format!("{:?}", drain), "Drain([1, 2, 3, 4])");
        }
        assert!(array.is_empty());
        assert_eq!(array.capacity(), capacity);
        array.extend(&[7, 8]);
        assert_eq!(array, [7, 8]);
    }

    #[test]
    fn test_drain_leak() {
        let mut array = DynArray::from_iter([String::from("x"), String::from("y")]);
        std::mem::forget(array.drain());
        assert!(array.is_empty());
        array.push_back(String::from("z")).unwrap();
        assert_eq!(array, [String::from("z")]);
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut array: DynArray<_> = (1..=3).collect();
        array.extend(vec![4, 5]);
        array.extend([6, 7].iter());
        assert_eq!(array, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(array.capacity(), 12);

        let mut sum = 0;
        for x in &array {
            sum += x;
        }
        assert_eq!(sum, 28);
        for x in &mut array {
            *x -= 1;
        }
        assert_eq!(Vec::from_iter(array), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_iter_zst() {
        let array = DynArray::from_iter(std::iter::repeat(()).take(5));
        assert_eq!(array.iter().count(), 5);
        assert_eq!(array.into_iter().rev().count(), 5);
    }
}
