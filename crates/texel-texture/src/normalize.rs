use num_traits::ToPrimitive;
use texel_tensor::Tensor2;

use crate::error::TextureError;

/// A co-occurrence matrix turned into a joint probability distribution, with its marginals.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedCooccurrence {
    /// The joint probability matrix `P`, of shape `n × n`. Sums to one unless the counts were all zero.
    pub p: Tensor2<f64>,
    /// Row marginal, `px[i] = Σ_j P[i, j]`.
    pub px: Vec<f64>,
    /// Column marginal, `py[j] = Σ_i P[i, j]`.
    pub py: Vec<f64>,
    /// Sum distribution, `px_plus_y[k] = Σ_{i + j = k} P[i, j]`, of length `2n`.
    pub px_plus_y: Vec<f64>,
    /// Difference distribution, `px_minus_y[k] = Σ_{|i - j| = k} P[i, j]`, of length `n`.
    pub px_minus_y: Vec<f64>,
}

impl NormalizedCooccurrence {
    /// Returns the number of labels `n`.
    #[inline]
    pub fn num_labels(&self) -> usize {
        self.px.len()
    }
}

/// Normalize a co-occurrence matrix into a joint probability distribution.
///
/// # Arguments
///
/// * `cmat` - The square co-occurrence matrix of counts.
/// * `ignore_background` - Whether to discard every pair involving label `0` before normalizing.
///
/// # Returns
///
/// The probability matrix and its marginals. A matrix without any counts gives all zeros.
///
/// # Errors
///
/// Returns [`TextureError::InvalidCooccurrenceShape`] if the matrix is empty or not square.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::normalize::normalize;
///
/// let cmat = Tensor2::<u64>::from_shape_vec([2, 2], vec![2, 1, 1, 0]).unwrap();
/// let norm = normalize(&cmat, false).unwrap();
///
/// assert_eq!(norm.p.as_slice(), &[0.5, 0.25, 0.25, 0.0]);
/// assert_eq!(norm.px, vec![0.75, 0.25]);
/// assert_eq!(norm.px_plus_y, vec![0.5, 0.5, 0.0, 0.0]);
/// assert_eq!(norm.px_minus_y, vec![0.5, 0.5]);
/// ```
pub fn normalize<C>(
    cmat: &Tensor2<C>,
    ignore_background: bool,
) -> Result<NormalizedCooccurrence, TextureError>
where
    C: ToPrimitive + Copy,
{
    let [rows, cols] = cmat.shape;
    if rows == 0 || rows != cols {
        return Err(TextureError::InvalidCooccurrenceShape {
            rows,
            cols,
            required: rows.max(cols).max(1),
        });
    }
    let n = rows;

    let mut p = cmat.map(|v| v.to_f64().unwrap_or(0.0));
    if ignore_background {
        let data = p.as_slice_mut();
        data[..n].iter_mut().for_each(|v| *v = 0.0);
        data.iter_mut().step_by(n).for_each(|v| *v = 0.0);
    }

    let total: f64 = p.iter().sum();
    if total > 0.0 {
        p.iter_mut().for_each(|v| *v /= total);
    }

    let mut px = vec![0.0; n];
    let mut py = vec![0.0; n];
    let mut px_plus_y = vec![0.0; 2 * n];
    let mut px_minus_y = vec![0.0; n];

    for (i, row) in p.as_slice().chunks_exact(n).enumerate() {
        for (j, &v) in row.iter().enumerate() {
            px[i] += v;
            py[j] += v;
            px_plus_y[i + j] += v;
            px_minus_y[i.abs_diff(j)] += v;
        }
    }

    Ok(NormalizedCooccurrence {
        p,
        px,
        py,
        px_plus_y,
        px_minus_y,
    })
}
