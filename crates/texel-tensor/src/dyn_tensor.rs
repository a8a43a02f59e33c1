use crate::tensor::{Tensor, TensorError};

/// Element type of a runtime-typed array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl DType {
    /// Returns true for the integer element types.
    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Returns true for the floating point element types.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::U32 => "u32",
            DType::U64 => "u64",
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F32 => "f32",
            DType::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

/// Owned element buffer of a [`DynTensor`], tagged with its element type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TensorData {
    /// `u8` elements.
    U8(Vec<u8>),
    /// `u16` elements.
    U16(Vec<u16>),
    /// `u32` elements.
    U32(Vec<u32>),
    /// `u64` elements.
    U64(Vec<u64>),
    /// `i8` elements.
    I8(Vec<i8>),
    /// `i16` elements.
    I16(Vec<i16>),
    /// `i32` elements.
    I32(Vec<i32>),
    /// `i64` elements.
    I64(Vec<i64>),
    /// `f32` elements.
    F32(Vec<f32>),
    /// `f64` elements.
    F64(Vec<f64>),
}

macro_rules! impl_tensor_data {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        impl TensorData {
            /// Returns the element type of the buffer.
            pub fn dtype(&self) -> DType {
                match self {
                    $(TensorData::$variant(_) => DType::$variant,)*
                }
            }

            /// Returns the number of elements in the buffer.
            pub fn len(&self) -> usize {
                match self {
                    $(TensorData::$variant(v) => v.len(),)*
                }
            }

            /// Returns true if the buffer holds no elements.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        $(
            impl From<Vec<$ty>> for TensorData {
                fn from(data: Vec<$ty>) -> Self {
                    TensorData::$variant(data)
                }
            }
        )*
    };
}

impl_tensor_data!(
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

/// A dense row-major array whose rank and element type are only known at runtime.
///
/// This is the entry point for data coming from dynamically typed sources, where the
/// caller cannot commit to a `Tensor<T, N>` type up front.
///
/// # Examples
///
/// ```
/// use texel_tensor::{DType, DynTensor};
///
/// let t = DynTensor::new(vec![2, 3], vec![0u16; 6]).unwrap();
/// assert_eq!(t.rank(), 2);
/// assert_eq!(t.dtype(), DType::U16);
///
/// assert!(DynTensor::new(vec![2, 3], vec![0.0f32; 5]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynTensor {
    /// The shape of the array.
    pub shape: Vec<usize>,
    /// The elements of the array in row-major order.
    pub data: TensorData,
}

impl DynTensor {
    /// Creates a new array from its shape and elements.
    ///
    /// # Errors
    ///
    /// If the number of elements does not match the shape, an error is returned.
    pub fn new(shape: Vec<usize>, data: impl Into<TensorData>) -> Result<Self, TensorError> {
        let data = data.into();
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        Ok(Self { shape, data })
    }

    /// Returns the number of dimensions of the array.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the element type of the array.
    #[inline]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Returns the number of elements in the array.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the shape as a fixed-size array of rank `N`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::UnsupportedRank`] if the array is not of rank `N`, and
    /// [`TensorError::InvalidShape`] if its public fields were edited into a shape that no
    /// longer matches the number of elements.
    pub fn shape_array<const N: usize>(&self) -> Result<[usize; N], TensorError> {
        let shape = <[usize; N]>::try_from(self.shape.as_slice()).map_err(|_| {
            TensorError::UnsupportedRank {
                expected: N,
                actual: self.rank(),
            }
        })?;
        let expected: usize = shape.iter().product();
        if expected != self.numel() {
            return Err(TensorError::invalid_shape(expected, self.numel()));
        }
        Ok(shape)
    }
}

impl<T, const N: usize> From<Tensor<T, N>> for DynTensor
where
    Vec<T>: Into<TensorData>,
{
    fn from(tensor: Tensor<T, N>) -> Self {
        Self {
            shape: tensor.shape.to_vec(),
            data: tensor.into_vec().into(),
        }
    }
}
