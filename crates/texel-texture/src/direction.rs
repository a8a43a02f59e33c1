//! Canonical neighbor directions for 2D and 3D images.
//!
//! A direction is one member of an antipodal pair of unit offsets. The opposite member is
//! covered by accumulating the co-occurrence matrix symmetrically, so 2D images have 4
//! directions and 3D images have 13 (half of the 26 non-zero neighbors).
//!
//! The index → offset mapping is part of the public contract: the rows of the feature
//! matrix returned by [`crate::haralick::haralick`] follow this order.

use texel_tensor::Tensor;

use crate::error::TextureError;

/// Offsets `(dy, dx)` of the 4 directions of a 2D image.
pub const DIRECTIONS_2D: [[isize; 2]; 4] = [[0, 1], [1, 1], [1, 0], [1, -1]];

/// Offsets `(d0, d1, d2)` of the 13 directions of a 3D image.
pub const DIRECTIONS_3D: [[isize; 3]; 13] = [
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [1, -1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
    [1, -1, 1],
    [1, 0, -1],
    [0, 1, -1],
    [1, 1, -1],
    [1, -1, -1],
];

/// Returns the number of canonical directions for an image of the given rank.
///
/// # Errors
///
/// Returns [`TextureError::UnsupportedDimensionality`] if `rank` is not 2 or 3.
pub fn num_directions(rank: usize) -> Result<usize, TextureError> {
    match rank {
        2 => Ok(DIRECTIONS_2D.len()),
        3 => Ok(DIRECTIONS_3D.len()),
        _ => Err(TextureError::UnsupportedDimensionality(rank)),
    }
}

/// Returns the unit offset of the direction `index` for an image of rank `N`.
///
/// # Errors
///
/// Returns an error if `N` is not 2 or 3, or if `index` is out of range for the rank.
///
/// # Example
///
/// ```
/// use texel_texture::direction::direction_delta;
///
/// assert_eq!(direction_delta::<2>(3).unwrap(), [1, -1]);
/// assert_eq!(direction_delta::<3>(12).unwrap(), [1, -1, -1]);
/// assert!(direction_delta::<2>(10).is_err());
/// ```
pub fn direction_delta<const N: usize>(index: usize) -> Result<[isize; N], TextureError> {
    let count = num_directions(N)?;
    if index >= count {
        return Err(TextureError::InvalidDirectionIndex {
            index,
            rank: N,
            num_directions: count,
        });
    }

    let delta: &[isize] = match N {
        2 => &DIRECTIONS_2D[index],
        _ => &DIRECTIONS_3D[index],
    };

    Ok(std::array::from_fn(|axis| delta[axis]))
}

/// Returns the offset of the direction `index` scaled by `distance`.
///
/// `None` means the offset is not representable, so no neighbor at that distance can lie
/// inside an image.
///
/// # Errors
///
/// Returns an error if `distance` is zero, or if the rank or direction is invalid.
pub(crate) fn scaled_delta<const N: usize>(
    index: usize,
    distance: usize,
) -> Result<Option<[isize; N]>, TextureError> {
    if distance == 0 {
        return Err(TextureError::InvalidDistance(distance));
    }
    let delta = direction_delta::<N>(index)?;
    let Ok(distance) = isize::try_from(distance) else {
        return Ok(None);
    };

    let mut scaled = [0isize; N];
    for (s, d) in scaled.iter_mut().zip(delta) {
        match d.checked_mul(distance) {
            Some(v) => *s = v,
            None => return Ok(None),
        }
    }
    Ok(Some(scaled))
}

/// Builds the neighbor pattern of the direction `index` scaled by `distance`.
///
/// The pattern is a cube of side `2 * distance + 1` holding a single `1` at
/// `center + delta * distance`.
///
/// # Errors
///
/// Returns an error if the rank or direction is invalid, or if `distance` is zero or so large
/// that the cube cannot be allocated.
///
/// # Example
///
/// ```
/// use texel_texture::direction::offset_pattern;
///
/// let pattern = offset_pattern::<2>(0, 1).unwrap();
/// assert_eq!(pattern.shape, [3, 3]);
/// assert_eq!(pattern.as_slice(), &[0, 0, 0, 0, 0, 1, 0, 0, 0]);
/// ```
pub fn offset_pattern<const N: usize>(
    index: usize,
    distance: usize,
) -> Result<Tensor<u8, N>, TextureError> {
    let too_far = || TextureError::InvalidDistance(distance);
    let delta = scaled_delta::<N>(index, distance)?.ok_or_else(too_far)?;

    let side = distance
        .checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .ok_or_else(too_far)?;
    let cells = side.checked_pow(N as u32).ok_or_else(too_far)?;
    if cells > isize::MAX as usize {
        return Err(too_far());
    }
    let mut pattern = Tensor::<u8, N>::zeros([side; N]);

    // the center is representable since `delta` is
    let center = distance as isize;
    let cell: [usize; N] = std::array::from_fn(|axis| (center + delta[axis]) as usize);
    if let Some(v) = pattern.get_mut(cell) {
        *v = 1;
    }

    Ok(pattern)
}

/// Decodes a neighbor pattern into its displacement vector.
///
/// This is the single place where the pattern representation is interpreted, shared by
/// every image rank. The displacement is the position of the nonzero cell relative to the
/// center cell.
///
/// # Errors
///
/// Returns [`TextureError::InvalidOffsetPattern`] if the sides are not all equal and odd,
/// or if the pattern does not hold exactly one nonzero cell.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::direction::decode_offset_pattern;
///
/// let mut pattern = Tensor2::<u8>::zeros([3, 3]);
/// *pattern.get_mut([2, 2]).unwrap() = 1;
/// assert_eq!(decode_offset_pattern(&pattern).unwrap(), [1, 1]);
/// ```
pub fn decode_offset_pattern<T, const N: usize>(
    pattern: &Tensor<T, N>,
) -> Result<[isize; N], TextureError>
where
    T: num_traits::Zero + PartialEq,
{
    let side = pattern.shape.first().copied().unwrap_or(0);
    if side % 2 == 0 || pattern.shape.iter().any(|&s| s != side) {
        return Err(TextureError::InvalidOffsetPattern(format!(
            "sides must be equal and odd, got {:?}",
            pattern.shape
        )));
    }

    let mut nonzero = pattern
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_zero())
        .map(|(offset, _)| offset);

    let (Some(offset), None) = (nonzero.next(), nonzero.next()) else {
        let count = pattern.iter().filter(|v| !v.is_zero()).count();
        return Err(TextureError::InvalidOffsetPattern(format!(
            "expected exactly one nonzero cell, found {count}"
        )));
    };

    let cell = pattern.get_index(offset)?;
    let center = (side / 2) as isize;

    Ok(std::array::from_fn(|axis| cell[axis] as isize - center))
}
