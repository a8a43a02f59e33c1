use num_traits::ToPrimitive;
use texel_tensor::{DynTensor, Tensor, Tensor1, Tensor2};

use crate::{
    cooccurrence::directional_cooccurrence,
    direction::num_directions,
    error::TextureError,
    features::{extract, DifferenceVarianceMode, FeatureOptions, SumVarianceMode},
    label::{matrix_side, with_label_slice, Label},
    normalize::normalize,
    parallel::{fill_rows_with, ExecutionStrategy},
};

/// Parameters of the Haralick feature computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaralickConfig {
    /// Discard every pair involving the background label `0`.
    pub ignore_zeros: bool,
    /// Formula for the sum variance.
    pub sum_variance: SumVarianceMode,
    /// Formula for the difference variance.
    pub difference_variance: DifferenceVarianceMode,
    /// Whether to compute the maximal correlation coefficient as a 14th feature.
    pub compute_14th_feature: bool,
    /// Distance between the paired pixels along each direction.
    pub distance: usize,
    /// How the directions are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for HaralickConfig {
    fn default() -> Self {
        Self {
            ignore_zeros: false,
            sum_variance: SumVarianceMode::Corrected,
            difference_variance: DifferenceVarianceMode::EntryVariance,
            compute_14th_feature: false,
            distance: 1,
            strategy: ExecutionStrategy::Parallel,
        }
    }
}

impl HaralickConfig {
    /// Returns the options forwarded to the feature extractor.
    pub fn feature_options(&self) -> FeatureOptions {
        FeatureOptions {
            sum_variance: self.sum_variance,
            difference_variance: self.difference_variance,
            compute_14th_feature: self.compute_14th_feature,
        }
    }
}

/// Compute the Haralick texture features of a label image in every direction.
///
/// For each canonical direction of the image rank, the symmetric co-occurrence matrix at the
/// configured distance is built, normalized and turned into a feature vector.
///
/// # Arguments
///
/// * `src` - The input label image, 2D or 3D, with non-negative integer labels.
/// * `config` - The computation parameters.
///
/// # Returns
///
/// A `D × F` matrix with one row per direction, in direction table order. `D` is 4 for 2D
/// images and 13 for 3D images, `F` is 13 or 14.
///
/// # Errors
///
/// Returns an error if the rank is not 2 or 3, if the distance is zero, or if a label is
/// negative or too large to allocate its co-occurrence matrix. The checks run before any
/// histogram is allocated.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::haralick::{haralick, HaralickConfig};
///
/// let image = Tensor2::<u8>::from_shape_fn([8, 8], |[i, j]| ((i + j) % 4) as u8);
///
/// let feats = haralick(&image, &HaralickConfig::default()).unwrap();
/// assert_eq!(feats.shape, [4, 13]);
/// ```
pub fn haralick<T: Label, const N: usize>(
    src: &Tensor<T, N>,
    config: &HaralickConfig,
) -> Result<Tensor2<f64>, TextureError> {
    haralick_slice(src.as_slice(), src.shape, config)
}

/// Compute the Haralick texture features of a runtime-typed label image.
///
/// Same as [`haralick`], for arrays whose element type and rank are only known at runtime.
///
/// # Errors
///
/// Returns [`TextureError::InvalidInputType`] for floating point arrays, then
/// [`TextureError::UnsupportedDimensionality`] for ranks other than 2 and 3, then the errors
/// of [`haralick`].
pub fn haralick_dyn(
    src: &DynTensor,
    config: &HaralickConfig,
) -> Result<Tensor2<f64>, TextureError> {
    if !src.dtype().is_integer() {
        return Err(TextureError::InvalidInputType(src.dtype()));
    }
    match src.rank() {
        2 => {
            let shape = src.shape_array::<2>()?;
            with_label_slice!(src, data => haralick_slice(data, shape, config))
        }
        3 => {
            let shape = src.shape_array::<3>()?;
            with_label_slice!(src, data => haralick_slice(data, shape, config))
        }
        rank => Err(TextureError::UnsupportedDimensionality(rank)),
    }
}

fn haralick_slice<T: Label, const N: usize>(
    data: &[T],
    shape: [usize; N],
    config: &HaralickConfig,
) -> Result<Tensor2<f64>, TextureError> {
    let num_dirs = num_directions(N)?;
    if config.distance == 0 {
        return Err(TextureError::InvalidDistance(config.distance));
    }
    let side = matrix_side(data)?;

    let options = config.feature_options();
    let num_feats = options.num_features();

    log::debug!(
        "haralick: rank {}, shape {:?}, {} directions, {} features, {} labels, strategy {:?}",
        N,
        shape,
        num_dirs,
        num_feats,
        side,
        config.strategy
    );

    let mut feats = Tensor2::<f64>::zeros([num_dirs, num_feats]);
    fill_rows_with(
        config.strategy,
        feats.as_slice_mut(),
        num_feats,
        |k, row| -> Result<(), TextureError> {
            let cmat = directional_cooccurrence(data, shape, k, config.distance, side)?;
            let norm = normalize(&cmat, config.ignore_zeros)?;
            row.copy_from_slice(&extract(&norm, &options));
            log::trace!("haralick: direction {k} done");
            Ok(())
        },
    )?;

    Ok(feats)
}

/// Compute the Haralick features of caller-supplied co-occurrence matrices.
///
/// Each matrix is normalized (honoring [`HaralickConfig::ignore_zeros`]) and turned into one
/// output row. The distance of the configuration is not used.
///
/// # Errors
///
/// Returns [`TextureError::InvalidCooccurrenceShape`] if a matrix is empty or not square.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::haralick::{haralick_features, HaralickConfig};
///
/// let cmat = Tensor2::<u32>::from_shape_vec([2, 2], vec![4, 1, 1, 2]).unwrap();
///
/// let feats = haralick_features(&[cmat.clone(), cmat], &HaralickConfig::default()).unwrap();
/// assert_eq!(feats.shape, [2, 13]);
/// assert_eq!(feats.row(0), feats.row(1));
/// ```
pub fn haralick_features<C>(
    matrices: &[Tensor2<C>],
    config: &HaralickConfig,
) -> Result<Tensor2<f64>, TextureError>
where
    C: ToPrimitive + Copy + Sync,
{
    let options = config.feature_options();
    let num_feats = options.num_features();

    let mut feats = Tensor2::<f64>::zeros([matrices.len(), num_feats]);
    fill_rows_with(
        config.strategy,
        feats.as_slice_mut(),
        num_feats,
        |k, row| -> Result<(), TextureError> {
            let norm = normalize(&matrices[k], config.ignore_zeros)?;
            row.copy_from_slice(&extract(&norm, &options));
            Ok(())
        },
    )?;

    Ok(feats)
}

/// Returns the mean of every feature over the directions.
///
/// A matrix without rows gives zeros.
pub fn mean_features(feats: &Tensor2<f64>) -> Tensor1<f64> {
    let [rows, cols] = feats.shape;
    let mut means = vec![0.0; cols];
    for row in feats.as_slice().chunks_exact(cols.max(1)) {
        means.iter_mut().zip(row).for_each(|(m, &v)| *m += v);
    }
    if rows > 0 {
        means.iter_mut().for_each(|m| *m /= rows as f64);
    }
    Tensor1::from_shape_fn([cols], |[j]| means[j])
}

/// Returns the mean of every feature followed by its range (max - min) over the directions.
///
/// The output has length `2F` for a `D × F` feature matrix.
///
/// # Example
///
/// ```
/// use texel_tensor::Tensor2;
/// use texel_texture::haralick::mean_ptp_features;
///
/// let feats = Tensor2::<f64>::from_shape_vec([2, 2], vec![1.0, 4.0, 3.0, 4.0]).unwrap();
/// assert_eq!(mean_ptp_features(&feats).as_slice(), &[2.0, 4.0, 2.0, 0.0]);
/// ```
pub fn mean_ptp_features(feats: &Tensor2<f64>) -> Tensor1<f64> {
    let [rows, cols] = feats.shape;
    let means = mean_features(feats);

    let ranges: Vec<f64> = (0..cols)
        .map(|j| {
            let column = (0..rows).map(|i| *feats.get_unchecked([i, j]));
            let (min, max) = column.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            if rows > 0 {
                max - min
            } else {
                0.0
            }
        })
        .collect();

    Tensor1::from_shape_fn([2 * cols], |[j]| {
        if j < cols {
            *means.get_unchecked([j])
        } else {
            ranges[j - cols]
        }
    })
}
