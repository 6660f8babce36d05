use super::math::{argmax, DTypeOps};
use crate::backend::{Backend, BackendOther, MatrixMultiplication};
use crate::tensor::{Dim2, ITensor, Tensor2, TensorBase, TensorBaseMut, TensorView1, TensorView2};
use std::fmt::{Debug, Formatter, Write};
use std::iter::zip;
use std::marker::PhantomData;

pub struct CpuBackend<DT: DTypeOps> {
    _dtype: PhantomData<DT>,
}

impl<DT: DTypeOps> CpuBackend<DT> {
    pub fn new() -> Self {
        CpuBackend { _dtype: PhantomData }
    }
}

impl<DT: DTypeOps> Default for CpuBackend<DT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<DT: DTypeOps> Clone for CpuBackend<DT> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<DT: DTypeOps> MatrixMultiplication for CpuBackend<DT> {
    type Float = DT;

    #[inline]
    fn matmul(
        &self,
        alpha: DT,
        a: TensorView2<DT>,
        ta: bool,
        b: TensorView2<DT>,
        tb: bool,
        beta: DT,
        c: &mut Tensor2<DT>,
    ) {
        DT::matrix_multiply(alpha, &a, ta, &b, tb, beta, c);
    }
}

impl<DT: DTypeOps> BackendOther for CpuBackend<DT> {
    fn add_row_broadcast(&self, matrix: &mut Tensor2<DT>, row: TensorView1<DT>) {
        assert_eq!(matrix.dims().cols(), row.len());
        for mut matrix_row in matrix.iter_major_axis_mut() {
            for (m, &r) in zip(matrix_row.iter_mut(), row) {
                *m += r;
            }
        }
    }

    fn argmax_rows(&self, matrix: TensorView2<DT>) -> Vec<usize> {
        matrix.iter_major_axis().map(|row| argmax(&row[..])).collect()
    }

    fn accum_confusion_matrix_multiclass(
        &self,
        matrix: &mut Tensor2<usize>,
        scores: TensorView2<DT>,
        expected: &[u8],
    ) {
        let &Dim2(rows, cols) = scores.dims();
        assert_eq!(rows, expected.len());
        assert_eq!(matrix.dims(), &Dim2(cols, cols));
        for (score_row, &expected_idx) in zip(scores.iter_major_axis(), expected) {
            let out_idx = argmax(&score_row[..]);
            matrix[[expected_idx as usize, out_idx]] += 1;
        }
    }
}

impl<DT: DTypeOps> Backend for CpuBackend<DT> {}

impl<DT: DTypeOps> Debug for CpuBackend<DT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("CpuBackend<")?;
        f.write_str(std::any::type_name::<DT>())?;
        f.write_char('>')
    }
}
