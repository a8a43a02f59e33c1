#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// gray-level co-occurrence matrix module.
pub mod cooccurrence;

/// canonical neighbor directions and offset patterns.
pub mod direction;

/// error types for the texture module.
pub mod error;

/// Haralick texture descriptors module.
pub mod features;

/// dispatch of the feature computation over the directions of an image.
pub mod haralick;

/// label image utilities.
pub mod label;

/// operations to normalize co-occurrence matrices.
pub mod normalize;

/// module containing parallelization utilities.
pub mod parallel;

pub use crate::error::TextureError;
pub use crate::features::{
    haralick_labels, DifferenceVarianceMode, FeatureOptions, HaralickFeature, SumVarianceMode,
};
pub use crate::haralick::{
    haralick, haralick_dyn, haralick_features, mean_features, mean_ptp_features, HaralickConfig,
};
pub use crate::parallel::ExecutionStrategy;
