use criterion::{black_box, criterion_group, criterion_main, Criterion};
use texel_tensor::{DynTensor, Tensor};

fn benchmark_tensor_clone(c: &mut Criterion) {
    let tensor = Tensor::<u16, 2>::from_shape_vec([512, 512], vec![1; 512 * 512]).unwrap();

    c.bench_function("tensor clone", |b| {
        b.iter(|| {
            let _clone = black_box(&tensor).clone();
        })
    });
}

fn benchmark_map(c: &mut Criterion) {
    let tensor = Tensor::<u64, 2>::from_shape_fn([512, 512], |[i, j]| ((i * j) % 256) as u64);

    c.bench_function("map u64 to f64", |b| {
        b.iter(|| {
            let _result = black_box(&tensor).map(|&v| v as f64);
        })
    });
}

fn benchmark_into_dyn(c: &mut Criterion) {
    let tensor = Tensor::<u8, 3>::from_shape_val([64, 64, 64], 3);

    c.bench_function("into dyn tensor", |b| {
        b.iter(|| {
            let _dyn = DynTensor::from(black_box(&tensor).clone());
        })
    });
}

criterion_group!(
    benches,
    benchmark_tensor_clone,
    benchmark_map,
    benchmark_into_dyn
);
criterion_main!(benches);
