#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use texel_tensor as tensor;

#[doc(inline)]
pub use texel_texture as texture;

#[cfg(test)]
mod tests {
    use super::{tensor::Tensor2, texture};

    #[test]
    fn reexports() -> Result<(), texture::TextureError> {
        let image = Tensor2::<u8>::from_shape_fn([6, 6], |[i, j]| ((i + j) % 3) as u8);
        let feats = texture::haralick(&image, &texture::HaralickConfig::default())?;
        assert_eq!(feats.shape, [4, 13]);
        Ok(())
    }
}
