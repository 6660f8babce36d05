use crate::dtype::DTypeFloat;
use crate::tensor::{Tensor2, TensorView1, TensorView2};
use std::fmt::Debug;

mod cpu;

pub use cpu::*;

pub trait MatrixMultiplication {
    type Float: DTypeFloat;

    /// performs a generic matrix multiplication (gemm) operation: `c = alpha * op(a) * op(b) + beta * c`
    #[allow(clippy::too_many_arguments)]
    fn matmul(
        &self,
        alpha: Self::Float,
        a: TensorView2<Self::Float>,
        ta: bool,
        b: TensorView2<Self::Float>,
        tb: bool,
        beta: Self::Float,
        c: &mut Tensor2<Self::Float>,
    );
}

pub trait BackendOther: MatrixMultiplication {
    /// adds `row` to every row of `matrix`
    fn add_row_broadcast(&self, matrix: &mut Tensor2<Self::Float>, row: TensorView1<Self::Float>);

    /// index of the largest entry of every row, lowest index on ties
    fn argmax_rows(&self, matrix: TensorView2<Self::Float>) -> Vec<usize>;

    /// counts `(expected, predicted)` pairs, rows of `matrix` are indexed by the expected label
    fn accum_confusion_matrix_multiclass(
        &self,
        matrix: &mut Tensor2<usize>,
        scores: TensorView2<Self::Float>,
        expected: &[u8],
    );
}

pub trait Backend: 'static + Debug + MatrixMultiplication + BackendOther {}
