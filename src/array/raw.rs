use crate::error::ArrayError;
use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

/// The single allocation owned by a `DynArray`.
///
/// A `RawBuffer` only knows about slots, never about which of them hold live
/// elements: dropping it releases the block without running any destructor.
/// Whoever owns the buffer is responsible for dropping or moving out the live
/// elements first.
///
/// Zero-sized element types never touch the allocator. Their capacity is still
/// tracked so that the growth policy stays observable.
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty buffer without any allocation.
    pub(crate) fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate a buffer of exactly `capacity` slots.
    ///
    /// Nothing is allocated for `capacity == 0` or zero-sized `T`.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        if Self::IS_ZST {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap: capacity,
                _marker: PhantomData,
            });
        }
        let layout = Layout::array::<T>(capacity).map_err(|_| ArrayError::CapacityOverflow)?;
        // SAFETY: `layout` has a non-zero size since `capacity > 0` and `T` is not a ZST.
        let ptr = unsafe { alloc::alloc(layout) };
        match NonNull::new(ptr.cast::<T>()) {
            Some(ptr) => Ok(Self {
                ptr,
                cap: capacity,
                _marker: PhantomData,
            }),
            None => {
                log::error!(
                    "allocator refused {} bytes for {} slots",
                    layout.size(),
                    capacity
                );
                Err(ArrayError::AllocationFailure { layout })
            }
        }
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.cap == 0 || Self::IS_ZST {
            return;
        }
        if let Ok(layout) = Layout::array::<T>(self.cap) {
            log::debug!("releasing buffer of {} slots", self.cap);
            // SAFETY: the block was allocated in `try_with_capacity` with this
            // exact layout, and is released only once.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

unsafe impl<T: Send> Send for RawBuffer<T> {}

unsafe impl<T: Sync> Sync for RawBuffer<T> {}

/// Surface an allocation error from an infallible trait method (`Clone`,
/// `Extend`, ...), the same way std collections do.
pub(crate) fn handle_alloc_result<R>(result: Result<R, ArrayError>) -> R {
    match result {
        Ok(value) => value,
        Err(ArrayError::AllocationFailure { layout }) => alloc::handle_alloc_error(layout),
        Err(err) => panic!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::RawBuffer;
    use crate::error::ArrayError;

    #[test]
    fn raw_buffer_empty() {
        let buf = RawBuffer::<u32>::new();
        assert_eq!(buf.capacity(), 0);
        let buf = RawBuffer::<u32>::try_with_capacity(0).unwrap();
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn raw_buffer_exact_capacity() {
        let buf = RawBuffer::<String>::try_with_capacity(7).unwrap();
        assert_eq!(buf.capacity(), 7);
        assert!(!buf.as_ptr().is_null());
    }

    #[test]
    fn raw_buffer_zst() {
        let buf = RawBuffer::<()>::try_with_capacity(usize::MAX).unwrap();
        assert_eq!(buf.capacity(), usize::MAX);
    }

    #[test]
    fn raw_buffer_overflow() {
        let result = RawBuffer::<u64>::try_with_capacity(usize::MAX / 2);
        assert_eq!(result.err(), Some(ArrayError::CapacityOverflow));
    }
}
