use rand::{rngs::StdRng, Rng, SeedableRng};
use texel_tensor::{DType, DynTensor, Tensor, Tensor2, Tensor3};
use texel_texture::{
    cooccurrence::cooccurrence_dyn, haralick, haralick_dyn, mean_ptp_features, ExecutionStrategy,
    HaralickConfig, SumVarianceMode, TextureError,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_labels<const N: usize>(shape: [usize; N], seed: u64) -> Tensor<i32, N> {
    let mut rng = StdRng::seed_from_u64(seed);
    let numel: usize = shape.iter().product();
    let data = (0..numel).map(|_| rng.random_range(0..255)).collect();
    Tensor::from_shape_vec(shape, data).expect("shape matches the data")
}

fn assert_finite(feats: &Tensor2<f64>) {
    assert!(
        feats.iter().all(|v| v.is_finite()),
        "non finite features: {feats}"
    );
}

fn all_options() -> Vec<HaralickConfig> {
    let mut configs = Vec::new();
    for ignore_zeros in [false, true] {
        for compute_14th_feature in [false, true] {
            configs.push(HaralickConfig {
                ignore_zeros,
                compute_14th_feature,
                ..Default::default()
            });
        }
    }
    configs
}

#[test]
fn haralick_random_image_is_finite() -> Result<(), TextureError> {
    init_logger();
    let image: Tensor2<i32> = random_labels([1024, 1024], 123);
    let feats = haralick(&image, &HaralickConfig::default())?;
    assert_eq!(feats.shape, [4, 13]);
    assert_finite(&feats);
    Ok(())
}

#[test]
fn haralick_random_volume_is_finite() -> Result<(), TextureError> {
    init_logger();
    let image: Tensor3<i32> = random_labels([34, 12, 8], 123);
    let feats = haralick(&image, &HaralickConfig::default())?;
    assert_eq!(feats.shape, [13, 13]);
    assert_finite(&feats);
    Ok(())
}

#[test]
fn haralick_zeros_are_finite() -> Result<(), TextureError> {
    let zeros = Tensor2::<u8>::zeros([64, 64]);
    for config in all_options() {
        assert_finite(&haralick(&zeros, &config)?);
    }
    Ok(())
}

#[test]
fn haralick_single_point_is_finite() -> Result<(), TextureError> {
    let mut image = Tensor2::<u8>::zeros([5, 5]);
    if let Some(v) = image.get_mut([2, 2]) {
        *v = 12;
    }
    for config in all_options() {
        let feats = haralick(&image, &config)?;
        assert_finite(&feats);
        if config.ignore_zeros {
            // every pair touches the background
            assert!(feats.iter().all(|&v| v == 0.0));
        }
    }
    Ok(())
}

#[test]
fn haralick_shapes() -> Result<(), TextureError> {
    let volume: Tensor3<i32> = random_labels([20, 20, 4], 22);
    assert_eq!(haralick(&volume, &HaralickConfig::default())?.shape, [13, 13]);

    let slice = Tensor2::<i32>::from_shape_fn([20, 20], |[i, j]| {
        *volume.get_unchecked([i, j, 0])
    });
    assert_eq!(haralick(&slice, &HaralickConfig::default())?.shape, [4, 13]);

    let config = HaralickConfig {
        ignore_zeros: true,
        sum_variance: SumVarianceMode::PreserveHaralickBug,
        compute_14th_feature: true,
        ..Default::default()
    };
    let feats = haralick(&slice, &config)?;
    assert_eq!(feats.shape, [4, 14]);
    assert_finite(&feats);
    assert_eq!(mean_ptp_features(&feats).numel(), 28);
    Ok(())
}

#[test]
fn haralick_strategies_agree_on_random_volume() -> Result<(), TextureError> {
    let volume: Tensor3<i32> = random_labels([16, 16, 6], 5);
    let serial = haralick(
        &volume,
        &HaralickConfig {
            strategy: ExecutionStrategy::Serial,
            compute_14th_feature: true,
            ..Default::default()
        },
    )?;
    let parallel = haralick(
        &volume,
        &HaralickConfig {
            strategy: ExecutionStrategy::Parallel,
            compute_14th_feature: true,
            ..Default::default()
        },
    )?;
    assert_eq!(serial, parallel);
    Ok(())
}

#[test]
fn float_images_are_rejected() -> Result<(), TextureError> {
    let mut values = vec![0.0f32; 25];
    values[12] = 12.0;
    let image = DynTensor::new(vec![5, 5], values)?;

    assert_eq!(
        cooccurrence_dyn(&image, 0, true, 1),
        Err(TextureError::InvalidInputType(DType::F32))
    );
    assert_eq!(
        haralick_dyn(&image, &HaralickConfig::default()),
        Err(TextureError::InvalidInputType(DType::F32))
    );
    Ok(())
}

#[test]
fn unsupported_ranks_are_rejected() -> Result<(), TextureError> {
    let f4 = DynTensor::new(vec![6, 6, 6, 6], vec![0u8; 6 * 6 * 6 * 6])?;
    assert_eq!(
        cooccurrence_dyn(&f4, 1, true, 1),
        Err(TextureError::UnsupportedDimensionality(4))
    );

    let f5 = DynTensor::new(vec![4; 5], (0..1024i64).collect::<Vec<_>>())?;
    assert_eq!(
        haralick_dyn(&f5, &HaralickConfig::default()),
        Err(TextureError::UnsupportedDimensionality(5))
    );

    let f1 = DynTensor::new(vec![8], vec![1u16; 8])?;
    assert_eq!(
        haralick_dyn(&f1, &HaralickConfig::default()),
        Err(TextureError::UnsupportedDimensionality(1))
    );
    Ok(())
}

#[test]
fn invalid_directions_are_rejected() -> Result<(), TextureError> {
    let f2 = DynTensor::new(vec![6, 6], vec![0u8; 36])?;
    let f3 = DynTensor::new(vec![6, 6, 6], vec![0u8; 216])?;

    assert!(matches!(
        cooccurrence_dyn(&f2, 10, true, 1),
        Err(TextureError::InvalidDirectionIndex { index: 10, rank: 2, .. })
    ));
    assert!(matches!(
        cooccurrence_dyn(&f3, 17, true, 1),
        Err(TextureError::InvalidDirectionIndex { index: 17, rank: 3, .. })
    ));
    Ok(())
}
