use num_traits::PrimInt;

use crate::error::TextureError;

/// Element type of a label image.
///
/// Implemented for every primitive integer type. Floating point elements do not
/// implement it, so typed label images with float elements are rejected at compile time.
pub trait Label: PrimInt + Send + Sync {}

impl<T: PrimInt + Send + Sync> Label for T {}

/// Returns the largest label of the image in a single pass.
///
/// An empty image has a maximum label of `0`.
///
/// # Errors
///
/// Returns [`TextureError::NegativeLabel`] if any label is negative, and
/// [`TextureError::LabelTooLarge`] if the largest label does not fit in a `usize`.
pub fn max_label<T: Label>(labels: &[T]) -> Result<usize, TextureError> {
    let mut max = T::zero();
    for &v in labels {
        if v < T::zero() {
            return Err(TextureError::NegativeLabel);
        }
        if v > max {
            max = v;
        }
    }
    max.to_usize()
        .ok_or_else(|| TextureError::LabelTooLarge(max.to_u128().unwrap_or(u128::MAX)))
}

/// Returns the side of the co-occurrence matrix of an image, one more than its largest label.
///
/// # Errors
///
/// Returns [`TextureError::NegativeLabel`] if any label is negative, and
/// [`TextureError::LabelTooLarge`] if a `side × side` matrix of `u64` counts exceeds the
/// largest possible allocation.
///
/// # Example
///
/// ```
/// use texel_texture::label::matrix_side;
///
/// assert_eq!(matrix_side(&[0u8, 3, 1]).unwrap(), 4);
/// assert!(matrix_side(&[u64::MAX]).is_err());
/// ```
pub fn matrix_side<T: Label>(labels: &[T]) -> Result<usize, TextureError> {
    let max = max_label(labels)?;
    let too_large = || TextureError::LabelTooLarge(max as u128);

    let side = max.checked_add(1).ok_or_else(too_large)?;
    let bytes = side
        .checked_mul(side)
        .and_then(|cells| cells.checked_mul(std::mem::size_of::<u64>()))
        .ok_or_else(too_large)?;
    if bytes > isize::MAX as usize {
        return Err(too_large());
    }
    Ok(side)
}

/// Converts a validated label into a matrix index.
#[inline(always)]
pub(crate) fn label_index<T: Label>(v: T) -> usize {
    v.to_usize().unwrap_or_default()
}

/// Runs `$body` with `$data` bound to the typed element slice of a `DynTensor`.
///
/// Floating point arrays evaluate to [`TextureError::InvalidInputType`] without running `$body`.
macro_rules! with_label_slice {
    ($tensor:expr, $data:ident => $body:expr) => {{
        use texel_tensor::TensorData;
        match &$tensor.data {
            TensorData::U8(v) => {
                let $data: &[u8] = v;
                $body
            }
            TensorData::U16(v) => {
                let $data: &[u16] = v;
                $body
            }
            TensorData::U32(v) => {
                let $data: &[u32] = v;
                $body
            }
            TensorData::U64(v) => {
                let $data: &[u64] = v;
                $body
            }
            TensorData::I8(v) => {
                let $data: &[i8] = v;
                $body
            }
            TensorData::I16(v) => {
                let $data: &[i16] = v;
                $body
            }
            TensorData::I32(v) => {
                let $data: &[i32] = v;
                $body
            }
            TensorData::I64(v) => {
                let $data: &[i64] = v;
                $body
            }
            TensorData::F32(_) | TensorData::F64(_) => Err(
                $crate::error::TextureError::InvalidInputType($tensor.dtype()),
            ),
        }
    }};
}

pub(crate) use with_label_slice;
