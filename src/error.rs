use std::alloc::Layout;
use thiserror::Error;

/// Errors reported by the checked operations of a [`DynArray`].
///
/// [`DynArray`]: crate::DynArray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// Popping or reading the front/back of an empty array.
    #[error("the array is empty")]
    EmptyContainer,

    /// Checked element access with `index >= len`.
    #[error("index (is {index}) should be < len (is {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A [`Position`] that cannot be used with this array.
    ///
    /// [`Position`]: crate::Position
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),

    /// The requested capacity does not fit in `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocator refused to provide the requested block.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocationFailure { layout: Layout },
}

/// Why a [`Position`] was rejected.
///
/// [`Position`]: crate::Position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("the position belongs to another array")]
    ForeignArray,

    /// The storage was reallocated or shifted after the position was taken.
    /// Only reported with `feature = "generation"`.
    #[error("the position was taken at generation {taken}, but the array is at generation {current}")]
    Stale { taken: u64, current: u64 },

    #[error("offset (is {offset}) is out of bounds (len is {len})")]
    OutOfBounds { offset: isize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::{ArrayError, PositionError};
    use std::alloc::Layout;

    #[test]
    fn error_messages() {
        assert_eq!(ArrayError::EmptyContainer.to_string(), "the array is empty");
        assert_eq!(
            ArrayError::IndexOutOfRange { index: 3, len: 2 }.to_string(),
            "index (is 3) should be < len (is 2)"
        );
        assert_eq!(
            ArrayError::from(PositionError::OutOfBounds { offset: -1, len: 0 }).to_string(),
            "invalid position: offset (is -1) is out of bounds (len is 0)"
        );
        let layout = Layout::array::<u64>(4).unwrap();
        assert_eq!(
            ArrayError::AllocationFailure { layout }.to_string(),
            "memory allocation of 32 bytes failed"
        );
    }
}
