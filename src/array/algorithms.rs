use crate::array::raw::handle_alloc_result;
use crate::array::DynArray;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

impl<T: PartialEq<U>, U> PartialEq<DynArray<U>> for DynArray<T> {
    fn eq(&self, other: &DynArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<[U]> for DynArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<&[U; N]> for DynArray<T> {
    fn eq(&self, other: &&[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for DynArray<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialOrd> PartialOrd for DynArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for DynArray<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

/// Hashes the same as the slice of its elements.
impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

/// The clone is a deep copy with a tight allocation and a fresh identity, so
/// positions of the source are foreign to it.
///
/// # Examples
///
/// ```
/// use dyn_array::dyn_array;
///
/// let mut source = dyn_array![1, 2, 3];
/// source.reserve(10).unwrap();
///
/// let mut copy = source.clone();
/// assert_eq!(copy, source);
/// assert_eq!(copy.capacity(), 3);
///
/// copy.push_back(4).unwrap();
/// assert_eq!(source, [1, 2, 3]);
/// ```
impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        handle_alloc_result(self.try_clone())
    }

    /// Copy-and-swap: `self` is only replaced once the copy is complete, and
    /// its previous contents are dropped afterwards.
    fn clone_from(&mut self, other: &Self) {
        let mut copy = other.clone();
        self.swap(&mut copy);
    }
}

impl<T> DynArray<T> {
    /// Returns `true` if the `DynArray` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::new();
    ///
    /// array.push_back(0).unwrap();
    /// array.push_back(1).unwrap();
    /// array.push_back(2).unwrap();
    ///
    /// assert_eq!(array.contains(&0), true);
    /// assert_eq!(array.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.as_slice().contains(x)
    }

    /// Convert the `DynArray` into a `Vec`, moving the elements.
    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(array: [T; N]) -> Self {
        Self::from_iter(array)
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    fn from(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }
}

impl<T> From<Vec<T>> for DynArray<T> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_iter(vec)
    }
}

impl<T> From<DynArray<T>> for Vec<T> {
    fn from(array: DynArray<T>) -> Self {
        array.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use crate::array::DynArray;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<H: Hash + ?Sized>(value: &H) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_eq_and_ord() {
        let a = DynArray::from([1, 2, 3]);
        let b = DynArray::from(vec![1, 2, 4]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(a, [1, 2, 3]);
        assert_eq!(a, &[1, 2, 3][..]);
        assert_eq!(a, vec![1, 2, 3]);
        assert!(DynArray::<i32>::new() < a);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_hash_matches_slice() {
        let a = DynArray::from(["x", "y"]);
        assert_eq!(hash_of(&a), hash_of(&["x", "y"][..]));
        assert_eq!(hash_of(&a), hash_of(&a.clone()));
    }

    #[test]
    fn test_clone_isolation() {
        let mut source = DynArray::from([String::from("a"), String::from("b")]);
        let mut copy = source.clone();
        copy[0].push('!');
        source.push_back(String::from("c")).unwrap();
        assert_eq!(source, ["a", "b", "c"]);
        assert_eq!(copy, ["a!", "b"]);
        assert_ne!(source.as_ptr(), copy.as_ptr());
        assert!(!copy.is_valid_position(source.begin()));
    }

    #[test]
    fn test_clone_from() {
        let mut target = DynArray::from([9, 9, 9, 9, 9]);
        let pos = target.begin();
        let source = DynArray::from([1, 2]);
        target.clone_from(&source);
        assert_eq!(target, [1, 2]);
        assert_eq!(target.capacity(), 2);
        #[cfg(feature = "generation")]
        assert!(!target.is_valid_position(pos));
        #[cfg(not(feature = "generation"))]
        assert!(target.is_valid_position(pos));

        let mut same = source.clone();
        same.clone_from(&source.clone());
        assert_eq!(same, source);
    }

    #[test]
    fn test_conversions() {
        let slice: &[u8] = &[1, 2, 3];
        let mut array = DynArray::from(slice);
        array.as_mut()[0] = 0;
        assert_eq!(array.as_ref(), &[0, 2, 3]);
        assert!(array.contains(&2));
        assert!(!array.contains(&1));
        let vec: Vec<u8> = array.into();
        assert_eq!(vec, vec![0, 2, 3]);
    }
}
