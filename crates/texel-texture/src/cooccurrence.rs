use texel_tensor::{tensor::get_strides_from_shape, DynTensor, Tensor, Tensor2};

use crate::{
    direction::{decode_offset_pattern, scaled_delta},
    error::TextureError,
    label::{label_index, matrix_side, with_label_slice, Label},
};

/// Compute the co-occurrence matrix of a label image into a preallocated matrix.
///
/// For every position `p` such that `p + offset` lies inside the image, the cell
/// `dst[label(p), label(p + offset)]` is incremented. There is no wraparound and no padding.
/// The offset is given as a neighbor pattern (see [`crate::direction::offset_pattern`]).
///
/// # Arguments
///
/// * `src` - The input label image, 2D or 3D.
/// * `pattern` - The neighbor pattern with exactly one nonzero cell.
/// * `dst` - The output matrix. Must be square with a side larger than the maximum label.
///   It is zeroed before accumulation.
/// * `symmetric` - Whether to add the transpose of the counts, i.e. count both the forward
///   and the backward neighbor relationship.
///
/// # Errors
///
/// Returns an error if the image is not 2D or 3D, if a label is negative, if the pattern is
/// malformed or if `dst` is too small.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::cooccurrence::cooccurrence_into;
/// use texel_texture::direction::offset_pattern;
///
/// let image = Tensor2::<u8>::from_shape_vec([2, 2], vec![0, 1, 1, 1]).unwrap();
/// let pattern = offset_pattern::<2>(0, 1).unwrap();
///
/// let mut cmat = Tensor2::<u64>::zeros([4, 4]);
/// cooccurrence_into(&image, &pattern, &mut cmat, false).unwrap();
///
/// assert_eq!(cmat.get([0, 1]), Some(&1));
/// assert_eq!(cmat.get([1, 1]), Some(&1));
/// ```
pub fn cooccurrence_into<T, P, const N: usize>(
    src: &Tensor<T, N>,
    pattern: &Tensor<P, N>,
    dst: &mut Tensor2<u64>,
    symmetric: bool,
) -> Result<(), TextureError>
where
    T: Label,
    P: num_traits::Zero + PartialEq,
{
    check_rank(N)?;
    let delta = decode_offset_pattern(pattern)?;
    let side = matrix_side(src.as_slice())?;
    check_output_shape(dst, side)?;

    dst.iter_mut().for_each(|v| *v = 0);
    accumulate(src.as_slice(), src.shape, delta, dst);
    if symmetric {
        add_transpose(dst);
    }

    Ok(())
}

/// Compute the co-occurrence matrix of a label image for a neighbor pattern.
///
/// The output has shape `(L + 1, L + 1)` where `L` is the maximum label of the image.
///
/// # Errors
///
/// Returns an error if the image is not 2D or 3D, if a label is negative or if the pattern
/// is malformed.
pub fn cooccurrence_with_pattern<T, P, const N: usize>(
    src: &Tensor<T, N>,
    pattern: &Tensor<P, N>,
    symmetric: bool,
) -> Result<Tensor2<u64>, TextureError>
where
    T: Label,
    P: num_traits::Zero + PartialEq,
{
    check_rank(N)?;
    let delta = decode_offset_pattern(pattern)?;
    build(src.as_slice(), src.shape, Some(delta), symmetric)
}

/// Compute the co-occurrence matrix of a label image along a canonical direction.
///
/// # Arguments
///
/// * `src` - The input label image, 2D or 3D.
/// * `direction` - The direction index, in `[0, 4)` for 2D and `[0, 13)` for 3D images.
/// * `symmetric` - Whether to count both the forward and the backward neighbor relationship.
/// * `distance` - The neighbor distance along the direction, at least 1.
///
/// # Returns
///
/// A `(L + 1, L + 1)` matrix of pair counts, `L` being the maximum label.
///
/// # Errors
///
/// Returns an error if the rank is unsupported, if the direction index is out of range,
/// if `distance` is zero, or if a label is negative or too large to allocate the matrix.
/// A distance that does not fit in the image is not an error: the matrix is all zeros.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::cooccurrence::cooccurrence;
///
/// let image = Tensor2::<u8>::from_shape_vec([2, 2], vec![0, 1, 1, 1]).unwrap();
///
/// let cmat = cooccurrence(&image, 2, false, 1).unwrap();
/// assert_eq!(cmat.shape, [2, 2]);
/// assert_eq!(cmat.as_slice(), &[0, 1, 0, 1]);
/// ```
pub fn cooccurrence<T: Label, const N: usize>(
    src: &Tensor<T, N>,
    direction: usize,
    symmetric: bool,
    distance: usize,
) -> Result<Tensor2<u64>, TextureError> {
    cooccurrence_slice(src.as_slice(), src.shape, direction, symmetric, distance)
}

/// Compute the co-occurrence matrix of a runtime-typed label image along a canonical direction.
///
/// Same as [`cooccurrence`], for arrays whose element type and rank are only known at runtime.
///
/// # Errors
///
/// Returns [`TextureError::InvalidInputType`] for floating point arrays before anything else
/// is inspected, then the errors of [`cooccurrence`].
pub fn cooccurrence_dyn(
    src: &DynTensor,
    direction: usize,
    symmetric: bool,
    distance: usize,
) -> Result<Tensor2<u64>, TextureError> {
    if !src.dtype().is_integer() {
        return Err(TextureError::InvalidInputType(src.dtype()));
    }
    match src.rank() {
        2 => {
            let shape = src.shape_array::<2>()?;
            with_label_slice!(src, data => {
                cooccurrence_slice(data, shape, direction, symmetric, distance)
            })
        }
        3 => {
            let shape = src.shape_array::<3>()?;
            with_label_slice!(src, data => {
                cooccurrence_slice(data, shape, direction, symmetric, distance)
            })
        }
        rank => Err(TextureError::UnsupportedDimensionality(rank)),
    }
}

fn cooccurrence_slice<T: Label, const N: usize>(
    data: &[T],
    shape: [usize; N],
    direction: usize,
    symmetric: bool,
    distance: usize,
) -> Result<Tensor2<u64>, TextureError> {
    check_rank(N)?;
    let delta = scaled_delta::<N>(direction, distance)?;
    build(data, shape, delta, symmetric)
}

fn build<T: Label, const N: usize>(
    data: &[T],
    shape: [usize; N],
    delta: Option<[isize; N]>,
    symmetric: bool,
) -> Result<Tensor2<u64>, TextureError> {
    let side = matrix_side(data)?;
    Ok(build_sized(data, shape, delta, side, symmetric))
}

/// Build the co-occurrence matrix of a direction into a `side × side` matrix.
///
/// The labels must already be validated as non-negative and lower than `side`, which lets
/// several directions share a single max-scan of the image.
pub(crate) fn directional_cooccurrence<T: Label, const N: usize>(
    data: &[T],
    shape: [usize; N],
    direction: usize,
    distance: usize,
    side: usize,
) -> Result<Tensor2<u64>, TextureError> {
    let delta = scaled_delta::<N>(direction, distance)?;
    Ok(build_sized(data, shape, delta, side, true))
}

fn build_sized<T: Label, const N: usize>(
    data: &[T],
    shape: [usize; N],
    delta: Option<[isize; N]>,
    side: usize,
    symmetric: bool,
) -> Tensor2<u64> {
    let mut dst = Tensor2::<u64>::zeros([side, side]);

    // an unrepresentable offset never lands inside the image
    if let Some(delta) = delta {
        accumulate(data, shape, delta, &mut dst);
    }
    if symmetric {
        add_transpose(&mut dst);
    }

    dst
}

fn check_rank(rank: usize) -> Result<(), TextureError> {
    match rank {
        2 | 3 => Ok(()),
        _ => Err(TextureError::UnsupportedDimensionality(rank)),
    }
}

fn check_output_shape(dst: &Tensor2<u64>, required: usize) -> Result<(), TextureError> {
    let [rows, cols] = dst.shape;
    if rows != cols || rows < required {
        return Err(TextureError::InvalidCooccurrenceShape {
            rows,
            cols,
            required,
        });
    }
    Ok(())
}

/// Count label pairs at `delta` into `dst`, whose side must exceed every label.
///
/// Only source positions whose neighbor is in bounds are visited: along each axis they form
/// the range `[max(0, -d), extent - max(0, d))`. The last axis is contiguous and is scanned as
/// a single run per outer index.
fn accumulate<T: Label, const N: usize>(
    data: &[T],
    shape: [usize; N],
    delta: [isize; N],
    dst: &mut Tensor2<u64>,
) {
    if N == 0 {
        return;
    }
    let side = dst.shape[1];
    let counts = dst.as_slice_mut();
    let strides = get_strides_from_shape(shape);

    let mut lo = [0usize; N];
    let mut hi = [0usize; N];
    for axis in 0..N {
        let extent = shape[axis] as isize;
        let start = (-delta[axis]).max(0);
        let end = extent - delta[axis].max(0);
        if end <= start {
            // the neighbor never falls inside the image along this axis
            return;
        }
        lo[axis] = start as usize;
        hi[axis] = end as usize;
    }

    let shift: isize = (0..N).map(|axis| delta[axis] * strides[axis] as isize).sum();
    let run = hi[N - 1] - lo[N - 1];

    let mut index = lo;
    loop {
        let base: usize = (0..N).map(|axis| index[axis] * strides[axis]).sum();
        let neighbor = (base as isize + shift) as usize;

        let labels = &data[base..base + run];
        let neighbors = &data[neighbor..neighbor + run];
        for (&a, &b) in labels.iter().zip(neighbors) {
            counts[label_index(a) * side + label_index(b)] += 1;
        }

        // advance the outer axes like an odometer; the last axis is consumed by the run
        let mut axis = N - 1;
        loop {
            if axis == 0 {
                return;
            }
            axis -= 1;
            index[axis] += 1;
            if index[axis] < hi[axis] {
                break;
            }
            index[axis] = lo[axis];
        }
    }
}

/// Replace `m` by `m + mᵀ`.
fn add_transpose(m: &mut Tensor2<u64>) {
    let n = m.shape[0];
    let counts = m.as_slice_mut();
    for i in 0..n {
        counts[i * n + i] *= 2;
        for j in (i + 1)..n {
            let sum = counts[i * n + j] + counts[j * n + i];
            counts[i * n + j] = sum;
            counts[j * n + i] = sum;
        }
    }
}
