#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `texel-tensor` provides the array types the texture engine is built on:
//!
//! - **Tensor**: an owned, row-major array whose rank is a const generic
//! - **DynTensor**: an array whose rank and element type are only known at runtime
//!
//! ```rust
//! use texel_tensor::{DynTensor, Tensor2};
//!
//! let t = Tensor2::<u8>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
//! assert_eq!(t.get([1, 2]), Some(&6));
//!
//! let d = DynTensor::from(t);
//! assert_eq!(d.rank(), 2);
//! ```

/// Runtime-typed arrays.
pub mod dyn_tensor;

/// Serde module for JSON/other format serialization and deserialization.
#[cfg(feature = "serde")]
pub mod serde;

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::dyn_tensor::{DType, DynTensor, TensorData};
pub use crate::tensor::{Tensor, TensorError};

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T> = Tensor<T, 4>;
