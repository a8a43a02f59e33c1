use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Tensor;

/// Wire layout of a tensor: `{ data, shape, strides }`.
#[derive(Serialize)]
struct TensorRepr<'a, T> {
    data: &'a [T],
    shape: &'a [usize],
    strides: &'a [usize],
}

/// Strides are accepted but ignored on load, they are recomputed from the shape.
#[derive(Deserialize)]
struct OwnedTensorRepr<T> {
    data: Vec<T>,
    shape: Vec<usize>,
}

impl<T: Serialize, const N: usize> Serialize for Tensor<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TensorRepr {
            data: self.as_slice(),
            shape: &self.shape,
            strides: &self.strides,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for Tensor<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let OwnedTensorRepr { data, shape } = OwnedTensorRepr::deserialize(deserializer)?;
        let rank = shape.len();
        let shape: [usize; N] = shape.try_into().map_err(|_| {
            serde::de::Error::custom(format!("expected a shape of rank {}, got rank {}", N, rank))
        })?;
        Tensor::from_shape_vec(shape, data).map_err(serde::de::Error::custom)
    }
}
