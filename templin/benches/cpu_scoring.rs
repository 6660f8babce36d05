#[macro_use]
extern crate bencher;

use bencher::Bencher;
use templin::backend::{CpuBackend, MatrixMultiplication};
use templin::classifier::LinearClassifier;
use templin::tensor::{Dim2, ITensor, Tensor, TensorBase};
use templin::util::bench::*;

macro_rules! impl_matmul_bench {
    ($name:ident, $ty:ty, $batch:expr) => {
        fn $name(bench: &mut Bencher) {
            let backend = CpuBackend::<$ty>::new();
            let [images, weights] = get_scoring_operands::<$ty>($batch);
            let mut scores = Tensor::zeroed(Dim2(images.dims().rows(), weights.dims().rows()));
            bench.iter(|| backend.matmul(1.0, images.view(), false, weights.view(), true, 0.0, &mut scores))
        }
    };
}

macro_rules! impl_predict_bench {
    ($name:ident, $batch:expr) => {
        fn $name(bench: &mut Bencher) {
            let (weights, bias) = get_template_classifier_parts().unwrap();
            let classifier = LinearClassifier::new(CpuBackend::<f32>::new(), &weights, &bias);
            let [images, _] = get_scoring_operands::<f32>($batch);
            bench.iter(|| classifier.predict(images.view()))
        }
    };
}

impl_matmul_bench!(matmul_f32_lg, f32, BATCH_LG);
impl_matmul_bench!(matmul_f32_md, f32, BATCH_MD);
impl_matmul_bench!(matmul_f32_sm, f32, BATCH_SM);
benchmark_group!(matmul_f32, matmul_f32_lg, matmul_f32_md, matmul_f32_sm);

impl_matmul_bench!(matmul_f64_lg, f64, BATCH_LG);
impl_matmul_bench!(matmul_f64_md, f64, BATCH_MD);
impl_matmul_bench!(matmul_f64_sm, f64, BATCH_SM);
benchmark_group!(matmul_f64, matmul_f64_lg, matmul_f64_md, matmul_f64_sm);

impl_predict_bench!(predict_lg, BATCH_LG);
impl_predict_bench!(predict_md, BATCH_MD);
impl_predict_bench!(predict_sm, BATCH_SM);
benchmark_group!(predict, predict_lg, predict_md, predict_sm);

benchmark_main!(matmul_f32, matmul_f64, predict);
