use thiserror::Error;

/// Errors raised while building or indexing tensors.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// The number of elements does not match the shape.
    #[error("Invalid shape: the shape holds {expected} elements but {actual} were provided")]
    InvalidShape {
        /// Number of elements implied by the shape
        expected: usize,
        /// Number of elements provided
        actual: usize,
    },

    /// A linear offset is past the end of the tensor.
    #[error("Offset {index} is out of bounds for a tensor of {size} elements")]
    IndexOutOfBounds {
        /// The offending offset
        index: usize,
        /// The number of elements of the tensor
        size: usize,
    },

    /// A runtime-ranked array was converted into a tensor of another rank.
    #[error("Rank mismatch: expected a tensor of rank {expected}, got rank {actual}")]
    UnsupportedRank {
        /// Rank of the requested tensor type
        expected: usize,
        /// Rank of the source array
        actual: usize,
    },
}

impl TensorError {
    /// Shorthand for [`TensorError::InvalidShape`].
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Shorthand for [`TensorError::IndexOutOfBounds`].
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }
}

/// Returns the row-major strides of `shape`: the last axis is contiguous.
///
/// # Example
///
/// ```rust
/// use texel_tensor::tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([4, 5]), [5, 1]);
/// assert_eq!(get_strides_from_shape([3, 4, 5]), [20, 5, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides = [1; N];
    for axis in (0..N.saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Converts a linear row-major offset into a multi-dimensional index.
fn unravel<const N: usize>(mut offset: usize, shape: &[usize; N]) -> [usize; N] {
    let mut index = [0; N];
    for axis in (0..N).rev() {
        let extent = shape[axis].max(1);
        index[axis] = offset % extent;
        offset /= extent;
    }
    index
}

/// An owned, dense N-dimensional array in row-major order.
///
/// The rank `N` is part of the type; arrays whose rank is only known at runtime go through
/// [`crate::DynTensor`] instead.
///
/// # Example
///
/// ```rust
/// use texel_tensor::Tensor3;
///
/// let t = Tensor3::<u16>::from_shape_fn([2, 3, 4], |[i, j, k]| (i * 100 + j * 10 + k) as u16);
/// assert_eq!(t.strides, [12, 4, 1]);
/// assert_eq!(t.get([1, 2, 3]), Some(&123));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T, const N: usize> {
    /// The elements in row-major order.
    pub storage: Vec<T>,
    /// The extent of each axis.
    pub shape: [usize; N],
    /// The distance in elements between two consecutive indices of each axis.
    pub strides: [usize; N],
}

impl<T, const N: usize> Tensor<T, N> {
    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.storage
    }

    /// Consumes the tensor, returning its elements.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.storage
    }

    /// Iterates over the elements in row-major order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.iter()
    }

    /// Iterates mutably over the elements in row-major order.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.storage.iter_mut()
    }

    /// Wraps a row-major buffer into a tensor of the given shape.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] if `data` does not hold exactly as many elements as
    /// the shape.
    ///
    /// # Example
    ///
    /// ```
    /// use texel_tensor::Tensor2;
    ///
    /// let t = Tensor2::<i8>::from_shape_vec([2, 2], vec![1, -2, 3, -4]).unwrap();
    /// assert_eq!(t.get([1, 1]), Some(&-4));
    /// assert!(Tensor2::<i8>::from_shape_vec([3, 2], vec![0; 5]).is_err());
    /// ```
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TensorError::invalid_shape(expected, data.len()));
        }
        Ok(Self {
            storage: data,
            shape,
            strides: get_strides_from_shape(shape),
        })
    }

    /// Creates a tensor of the given shape with every element set to `value`.
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        Self {
            storage: vec![value; shape.iter().product()],
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a tensor by evaluating `f` at every index, in row-major order.
    ///
    /// # Example
    ///
    /// ```
    /// use texel_tensor::Tensor2;
    ///
    /// let t = Tensor2::<usize>::from_shape_fn([2, 3], |[i, j]| i * j);
    /// assert_eq!(t.as_slice(), &[0, 0, 0, 0, 1, 2]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let numel: usize = shape.iter().product();
        Self {
            storage: (0..numel).map(|offset| f(unravel(offset, &shape))).collect(),
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a tensor of the given shape filled with zeros.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Returns the number of elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the tensor holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the linear offset of `index`, or `None` if any component is out of range.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        index
            .iter()
            .zip(self.shape.iter().zip(self.strides.iter()))
            .try_fold(0, |offset, (&i, (&extent, &stride))| {
                (i < extent).then_some(offset + i * stride)
            })
    }

    /// Returns the multi-dimensional index of a linear offset.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::IndexOutOfBounds`] if `offset` is not lower than the number of
    /// elements.
    pub fn get_index(&self, offset: usize) -> Result<[usize; N], TensorError> {
        if offset >= self.numel() {
            return Err(TensorError::index_out_of_bounds(offset, self.numel()));
        }
        Ok(unravel(offset, &self.shape))
    }

    /// Returns the element at `index`, or `None` if it is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use texel_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(t.get([1, 0]), Some(&4));
    /// assert_eq!(t.get([0, 3]), None);
    /// ```
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        let offset = self.get_iter_offset(index)?;
        self.storage.get(offset)
    }

    /// Returns a mutable reference to the element at `index`, or `None` if it is out of range.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        let offset = self.get_iter_offset(index)?;
        self.storage.get_mut(offset)
    }

    /// Returns the element at `index` without checking each component against the shape.
    ///
    /// # Panics
    ///
    /// Panics if the resulting offset lies outside of the storage.
    #[inline]
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        let offset: usize = index.iter().zip(self.strides.iter()).map(|(i, s)| i * s).sum();
        &self.storage[offset]
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> Tensor<U, N>
    where
        F: Fn(&T) -> U,
    {
        Tensor {
            storage: self.storage.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }
}

impl<T> Tensor<T, 2> {
    /// Returns row `i` of a matrix.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a valid row index.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        let cols = self.shape[1];
        &self.storage[i * cols..(i + 1) * cols]
    }
}

impl<T, const N: usize> std::fmt::Display for Tensor<T, N>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let run = self.shape.last().copied().unwrap_or(1).max(1);
        write!(f, "Tensor{:?} [", self.shape)?;
        for (i, v) in self.storage.iter().enumerate() {
            if i > 0 && i % run == 0 {
                write!(f, ";")?;
            }
            write!(f, " {v}")?;
        }
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::{get_strides_from_shape, TensorError};
    use crate::{Tensor1, Tensor2, Tensor3};

    #[test]
    fn strides_row_major() {
        assert_eq!(get_strides_from_shape([7]), [1]);
        assert_eq!(get_strides_from_shape([2, 3, 4, 5]), [60, 20, 5, 1]);
        assert_eq!(get_strides_from_shape::<0>([]), []);
    }

    #[test]
    fn from_shape_vec_checks_length() -> Result<(), TensorError> {
        let t = Tensor2::<u8>::from_shape_vec([1, 2], vec![1, 2])?;
        assert_eq!(t.strides, [2, 1]);
        assert_eq!(t.numel(), 2);
        assert_eq!(
            Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3]),
            Err(TensorError::invalid_shape(4, 3))
        );
        Ok(())
    }

    #[test]
    fn get_3d() -> Result<(), TensorError> {
        let t = Tensor3::<u8>::from_shape_vec([2, 1, 3], vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(t.get([0, 0, 2]), Some(&3));
        assert_eq!(t.get([1, 0, 0]), Some(&4));
        assert!(t.get([2, 0, 0]).is_none());
        assert!(t.get([0, 1, 0]).is_none());
        assert!(t.get([0, 0, 3]).is_none());
        assert_eq!(*t.get_unchecked([1, 0, 1]), 5);
        Ok(())
    }

    #[test]
    fn get_mut_2d() {
        let mut t = Tensor2::<u64>::zeros([2, 3]);
        if let Some(v) = t.get_mut([1, 2]) {
            *v += 7;
        }
        assert_eq!(t.as_slice(), &[0, 0, 0, 0, 0, 7]);
        assert!(t.get_mut([2, 0]).is_none());
    }

    #[test]
    fn offset_and_index_agree() -> Result<(), TensorError> {
        let t = Tensor3::<u8>::zeros([2, 3, 4]);
        for offset in 0..t.numel() {
            let index = t.get_index(offset)?;
            assert_eq!(t.get_iter_offset(index), Some(offset));
        }
        assert_eq!(t.get_index(5)?, [0, 1, 1]);
        assert_eq!(t.get_index(24), Err(TensorError::index_out_of_bounds(24, 24)));
        Ok(())
    }

    #[test]
    fn rows_and_display() -> Result<(), TensorError> {
        let t = Tensor2::<u8>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(t.row(1), &[4, 5, 6]);
        assert_eq!(t.to_string(), "Tensor[2, 3] [ 1 2 3; 4 5 6 ]");
        Ok(())
    }
}
