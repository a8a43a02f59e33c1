//! Haralick texture descriptors of a normalized co-occurrence matrix.
//!
//! The descriptors follow Haralick, Shanmugam and Dinstein, "Textural Features for Image
//! Classification", IEEE Transactions on Systems, Man and Cybernetics, 1973. Entropies are
//! measured in bits and `0 · log 0` is taken as `0`.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::normalize::NormalizedCooccurrence;

/// Maximum number of QR iterations for the eigen decomposition of the 14th feature.
const MAX_EIGEN_ITERATIONS: usize = 1000;

/// Formula used for the sum variance descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SumVarianceMode {
    /// `Σ k² px+y(k) - (sum average)²`, the variance of the sum distribution.
    #[default]
    Corrected,
    /// `Σ (k - sum entropy)² px+y(k)`, as printed in the 1973 paper.
    ///
    /// The paper centers the sum distribution on the sum entropy instead of the sum average.
    /// Use this mode to reproduce values computed by tools that kept the formula as published.
    PreserveHaralickBug,
}

/// Formula used for the difference variance descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifferenceVarianceMode {
    /// Population variance of the entries of the difference distribution.
    #[default]
    EntryVariance,
    /// Variance of the difference `|i - j|` weighted by its probability.
    Weighted,
}

/// Options of the feature extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureOptions {
    /// Formula for the sum variance.
    pub sum_variance: SumVarianceMode,
    /// Formula for the difference variance.
    pub difference_variance: DifferenceVarianceMode,
    /// Whether to compute the maximal correlation coefficient.
    pub compute_14th_feature: bool,
}

impl FeatureOptions {
    /// Returns the number of descriptors produced with these options, 13 or 14.
    pub fn num_features(&self) -> usize {
        if self.compute_14th_feature {
            14
        } else {
            13
        }
    }
}

/// The Haralick descriptors, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaralickFeature {
    /// Angular second moment, also known as energy.
    AngularSecondMoment,
    /// Contrast.
    Contrast,
    /// Correlation.
    Correlation,
    /// Sum of squares: variance.
    SumOfSquaresVariance,
    /// Inverse difference moment, also known as homogeneity.
    InverseDifferenceMoment,
    /// Sum average.
    SumAverage,
    /// Sum variance.
    SumVariance,
    /// Sum entropy.
    SumEntropy,
    /// Entropy.
    Entropy,
    /// Difference variance.
    DifferenceVariance,
    /// Difference entropy.
    DifferenceEntropy,
    /// Information measure of correlation 1.
    InformationMeasureOfCorrelation1,
    /// Information measure of correlation 2.
    InformationMeasureOfCorrelation2,
    /// Maximal correlation coefficient.
    MaximalCorrelationCoefficient,
}

impl HaralickFeature {
    /// All the descriptors in output order.
    pub const ALL: [HaralickFeature; 14] = [
        HaralickFeature::AngularSecondMoment,
        HaralickFeature::Contrast,
        HaralickFeature::Correlation,
        HaralickFeature::SumOfSquaresVariance,
        HaralickFeature::InverseDifferenceMoment,
        HaralickFeature::SumAverage,
        HaralickFeature::SumVariance,
        HaralickFeature::SumEntropy,
        HaralickFeature::Entropy,
        HaralickFeature::DifferenceVariance,
        HaralickFeature::DifferenceEntropy,
        HaralickFeature::InformationMeasureOfCorrelation1,
        HaralickFeature::InformationMeasureOfCorrelation2,
        HaralickFeature::MaximalCorrelationCoefficient,
    ];

    /// Returns the human readable name of the descriptor.
    pub fn name(&self) -> &'static str {
        match self {
            HaralickFeature::AngularSecondMoment => "Angular Second Moment",
            HaralickFeature::Contrast => "Contrast",
            HaralickFeature::Correlation => "Correlation",
            HaralickFeature::SumOfSquaresVariance => "Sum of Squares: Variance",
            HaralickFeature::InverseDifferenceMoment => "Inverse Difference Moment",
            HaralickFeature::SumAverage => "Sum Average",
            HaralickFeature::SumVariance => "Sum Variance",
            HaralickFeature::SumEntropy => "Sum Entropy",
            HaralickFeature::Entropy => "Entropy",
            HaralickFeature::DifferenceVariance => "Difference Variance",
            HaralickFeature::DifferenceEntropy => "Difference Entropy",
            HaralickFeature::InformationMeasureOfCorrelation1 => {
                "Information Measure of Correlation 1"
            }
            HaralickFeature::InformationMeasureOfCorrelation2 => {
                "Information Measure of Correlation 2"
            }
            HaralickFeature::MaximalCorrelationCoefficient => "Maximal Correlation Coefficient",
        }
    }
}

impl std::fmt::Display for HaralickFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns the names of the descriptors in output order.
///
/// # Example
///
/// ```
/// use texel_texture::features::haralick_labels;
///
/// assert_eq!(haralick_labels(false).len(), 13);
/// assert_eq!(haralick_labels(true)[13], "Maximal Correlation Coefficient");
/// ```
pub fn haralick_labels(compute_14th_feature: bool) -> Vec<&'static str> {
    let count = FeatureOptions {
        compute_14th_feature,
        ..Default::default()
    }
    .num_features();
    HaralickFeature::ALL[..count]
        .iter()
        .map(HaralickFeature::name)
        .collect()
}

/// Compute the Haralick descriptors of a normalized co-occurrence matrix.
///
/// The descriptors are returned in [`HaralickFeature::ALL`] order, 13 of them or 14 when
/// [`FeatureOptions::compute_14th_feature`] is set. Every value is finite: degenerate
/// distributions (no counts, a single occupied label) produce zeros where a formula would
/// divide by zero.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::features::{extract, FeatureOptions};
/// use texel_texture::normalize::normalize;
///
/// let cmat = Tensor2::<u64>::from_shape_vec([2, 2], vec![2, 0, 0, 2]).unwrap();
/// let norm = normalize(&cmat, false).unwrap();
///
/// let feats = extract(&norm, &FeatureOptions::default());
/// assert_eq!(feats.len(), 13);
/// assert_eq!(feats[1], 0.0); // no contrast on the diagonal
/// ```
pub fn extract(norm: &NormalizedCooccurrence, options: &FeatureOptions) -> Vec<f64> {
    let mut feats = vec![0.0; options.num_features()];

    let n = norm.num_labels();
    let p = norm.p.as_slice();
    if n == 0 || p.iter().all(|&v| v == 0.0) {
        return feats;
    }

    let px = &norm.px;
    let py = &norm.py;
    let pxy_sum = &norm.px_plus_y;
    let pxy_diff = &norm.px_minus_y;

    let (mux, vx) = mean_and_variance(px);
    let (muy, vy) = mean_and_variance(py);

    let mut asm = 0.0;
    let mut ij_moment = 0.0;
    let mut idm = 0.0;
    for (i, row) in p.chunks_exact(n).enumerate() {
        for (j, &v) in row.iter().enumerate() {
            let d = i.abs_diff(j) as f64;
            asm += v * v;
            ij_moment += (i * j) as f64 * v;
            idm += v / (1.0 + d * d);
        }
    }

    let contrast: f64 = pxy_diff
        .iter()
        .enumerate()
        .map(|(k, &v)| (k * k) as f64 * v)
        .sum();

    let sigma = vx.max(0.0).sqrt() * vy.max(0.0).sqrt();
    let correlation = if sigma > 0.0 {
        (ij_moment - mux * muy) / sigma
    } else {
        0.0
    };

    let sum_average: f64 = pxy_sum.iter().enumerate().map(|(k, &v)| k as f64 * v).sum();
    let sum_entropy = entropy(pxy_sum);
    let sum_variance = match options.sum_variance {
        SumVarianceMode::Corrected => {
            let second: f64 = pxy_sum
                .iter()
                .enumerate()
                .map(|(k, &v)| (k * k) as f64 * v)
                .sum();
            second - sum_average * sum_average
        }
        SumVarianceMode::PreserveHaralickBug => pxy_sum
            .iter()
            .enumerate()
            .map(|(k, &v)| (k as f64 - sum_entropy).powi(2) * v)
            .sum(),
    };

    let hxy = entropy(p);

    let difference_variance = match options.difference_variance {
        DifferenceVarianceMode::EntryVariance => {
            let len = pxy_diff.len() as f64;
            let mean = pxy_diff.iter().sum::<f64>() / len;
            pxy_diff.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / len
        }
        DifferenceVarianceMode::Weighted => {
            let (_, var) = mean_and_variance(pxy_diff);
            var
        }
    };
    let difference_entropy = entropy(pxy_diff);

    let hx = entropy(px);
    let hy = entropy(py);
    let (hxy1, hxy2) = cross_entropies(p, px, py);

    let hmax = hx.max(hy);
    let imc1 = if hmax > 0.0 { (hxy - hxy1) / hmax } else { 0.0 };
    let imc2 = (1.0 - (-2.0 * (hxy2 - hxy)).exp()).max(0.0).sqrt();

    feats[0] = asm;
    feats[1] = contrast;
    feats[2] = correlation;
    feats[3] = vx;
    feats[4] = idm;
    feats[5] = sum_average;
    feats[6] = sum_variance;
    feats[7] = sum_entropy;
    feats[8] = hxy;
    feats[9] = difference_variance;
    feats[10] = difference_entropy;
    feats[11] = imc1;
    feats[12] = imc2;
    if options.compute_14th_feature {
        feats[13] = maximal_correlation_coefficient(p, px, py);
    }

    // non-finite values and negative zeros both become +0
    feats
        .iter_mut()
        .filter(|v| !v.is_finite() || **v == 0.0)
        .for_each(|v| *v = 0.0);

    feats
}

/// Mean and variance of the index of a probability vector.
fn mean_and_variance(dist: &[f64]) -> (f64, f64) {
    let (mean, second) = dist
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(m, s), (k, &v)| {
            let k = k as f64;
            (m + k * v, s + k * k * v)
        });
    (mean, second - mean * mean)
}

/// Entropy in bits of a probability vector.
fn entropy(dist: &[f64]) -> f64 {
    dist.iter()
        .filter(|&&v| v > 0.0)
        .fold(0.0, |h, &v| h - v * v.log2())
}

/// Returns `(HXY1, HXY2)`, the entropies of `P` and of `px ⊗ py` measured against `px ⊗ py`.
fn cross_entropies(p: &[f64], px: &[f64], py: &[f64]) -> (f64, f64) {
    let n = px.len();
    let mut hxy1 = 0.0;
    let mut hxy2 = 0.0;
    for (i, &a) in px.iter().enumerate() {
        for (j, &b) in py.iter().enumerate() {
            let q = a * b;
            if q > 0.0 {
                let lq = q.log2();
                hxy1 -= p[i * n + j] * lq;
                hxy2 -= q * lq;
            }
        }
    }
    (hxy1, hxy2)
}

/// Square root of the second largest eigenvalue of `Q = P Dy⁻¹ Pᵀ Dx⁻¹`.
///
/// `Q` is similar to `S Sᵀ` with `S = Dx^-½ P Dy^-½`, which is symmetric, so the eigenvalues
/// are taken from the latter over the labels with a non-zero marginal. The largest one is
/// always `1`. Returns `0` when fewer than two labels remain or the decomposition does not
/// converge.
fn maximal_correlation_coefficient(p: &[f64], px: &[f64], py: &[f64]) -> f64 {
    let n = px.len();
    let rows: Vec<usize> = (0..n).filter(|&i| px[i] > 0.0).collect();
    let cols: Vec<usize> = (0..n).filter(|&j| py[j] > 0.0).collect();
    if rows.len() < 2 || cols.is_empty() {
        return 0.0;
    }

    let s = DMatrix::<f64>::from_fn(rows.len(), cols.len(), |a, b| {
        let (i, j) = (rows[a], cols[b]);
        p[i * n + j] / (px[i] * py[j]).sqrt()
    });
    let sst = &s * s.transpose();

    let Some(eig) = SymmetricEigen::try_new(sst, f64::EPSILON, MAX_EIGEN_ITERATIONS) else {
        log::debug!("maximal correlation coefficient: eigen decomposition did not converge");
        return 0.0;
    };

    let mut eigenvalues: Vec<f64> = eig.eigenvalues.iter().copied().collect();
    eigenvalues.sort_by(|a, b| b.total_cmp(a));

    eigenvalues
        .get(1)
        .map(|&v| v.max(0.0).sqrt())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::TextureError, normalize::normalize};
    use approx::assert_abs_diff_eq;
    use texel_tensor::Tensor2;

    fn features_of(
        counts: Vec<u64>,
        n: usize,
        options: &FeatureOptions,
    ) -> Result<Vec<f64>, TextureError> {
        let cmat = Tensor2::<u64>::from_shape_vec([n, n], counts)?;
        Ok(extract(&normalize(&cmat, false)?, options))
    }

    #[test]
    fn features_perfect_correlation() -> Result<(), TextureError> {
        let options = FeatureOptions {
            compute_14th_feature: true,
            ..Default::default()
        };
        let f = features_of(vec![2, 0, 0, 2], 2, &options)?;

        assert_eq!(f.len(), 14);
        assert_abs_diff_eq!(f[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(f[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[2], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[3], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(f[4], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[5], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[6], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[7], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[8], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[9], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(f[10], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[11], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[12], (1.0 - (-2.0f64).exp()).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(f[13], 1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn features_independent_labels() -> Result<(), TextureError> {
        let options = FeatureOptions {
            compute_14th_feature: true,
            ..Default::default()
        };
        let f = features_of(vec![1, 1, 1, 1], 2, &options)?;

        assert_abs_diff_eq!(f[2], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[6], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(f[9], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[11], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[12], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[13], 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn features_variance_modes() -> Result<(), TextureError> {
        let options = FeatureOptions {
            sum_variance: SumVarianceMode::PreserveHaralickBug,
            difference_variance: DifferenceVarianceMode::Weighted,
            compute_14th_feature: false,
        };
        let f = features_of(vec![1, 1, 1, 1], 2, &options)?;

        assert_eq!(f.len(), 13);
        // centered on the sum entropy (1.5 bits) instead of the sum average (1)
        assert_abs_diff_eq!(f[6], 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(f[9], 0.25, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn features_contrast_matches_pairwise() -> Result<(), TextureError> {
        let counts = vec![4, 2, 1, 0, 2, 6, 3, 1, 1, 3, 5, 2, 0, 1, 2, 7];
        let cmat = Tensor2::<u64>::from_shape_vec([4, 4], counts)?;
        let norm = normalize(&cmat, false)?;
        let f = extract(&norm, &FeatureOptions::default());

        let mut contrast = 0.0;
        for i in 0..4 {
            for j in 0..4 {
                let d = i as f64 - j as f64;
                contrast += d * d * norm.p.get_unchecked([i, j]);
            }
        }
        assert_abs_diff_eq!(f[1], contrast, epsilon = 1e-12);
        assert!(f[2] > 0.0 && f[2] <= 1.0);
        assert!(f.iter().all(|v| v.is_finite()));
        Ok(())
    }

    #[test]
    fn features_empty_distribution() -> Result<(), TextureError> {
        let options = FeatureOptions {
            compute_14th_feature: true,
            ..Default::default()
        };
        let f = features_of(vec![0; 9], 3, &options)?;
        assert_eq!(f, vec![0.0; 14]);
        Ok(())
    }

    #[test]
    fn features_single_label() -> Result<(), TextureError> {
        let options = FeatureOptions {
            compute_14th_feature: true,
            ..Default::default()
        };
        let f = features_of(vec![0, 0, 0, 0, 0, 0, 0, 0, 8], 3, &options)?;

        assert!(f.iter().all(|v| v.is_finite()));
        assert_eq!(f[0], 1.0);
        assert_eq!(f[2], 0.0);
        assert_eq!(f[11], 0.0);
        assert_eq!(f[13], 0.0);
        // entropies of a certain outcome are +0, not -0
        assert!(!f[7].is_sign_negative());
        assert!(!f[8].is_sign_negative());
        assert!(!f[10].is_sign_negative());
        Ok(())
    }

    #[test]
    fn entropy_never_negative_zero() {
        assert!(entropy(&[0.0, 1.0, 0.0]).is_sign_positive());
        assert!(entropy(&[]).is_sign_positive());
        assert_abs_diff_eq!(entropy(&[0.5, 0.5]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn labels_follow_output_order() {
        let labels = haralick_labels(true);
        assert_eq!(labels.len(), 14);
        assert_eq!(labels[0], "Angular Second Moment");
        assert_eq!(labels[3], "Sum of Squares: Variance");
        assert_eq!(labels[11], "Information Measure of Correlation 1");
        assert_eq!(haralick_labels(false), labels[..13].to_vec());
        assert_eq!(HaralickFeature::Entropy.to_string(), "Entropy");
    }
}
