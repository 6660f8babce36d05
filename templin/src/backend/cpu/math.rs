use crate::dtype::{DType, DTypeFloat};
use crate::tensor::{Dim2, ITensor, TensorBase, TensorBaseMut};

/// Index of the largest element, the first one wins on ties.
///
/// NaN entries are skipped wherever they occur. An empty or all-NaN slice yields 0.
pub fn argmax<T: DType>(a: &[T]) -> usize {
    let mut best: Option<usize> = None;
    for (i, v) in a.iter().enumerate() {
        // NaN is the only value unordered with itself
        if v.partial_cmp(v).is_none() {
            continue;
        }
        if best.is_none_or(|b| *v > a[b]) {
            best = Some(i);
        }
    }
    best.unwrap_or(0)
}

pub trait DTypeOps: DTypeFloat {
    #[allow(clippy::too_many_arguments)]
    fn matrix_multiply<A, B, C>(alpha: Self, a: &A, ta: bool, b: &B, tb: bool, beta: Self, c: &mut C)
    where
        A: TensorBase<Self, Dim2>,
        B: TensorBase<Self, Dim2>,
        C: TensorBaseMut<Self, Dim2>;
}

macro_rules! implement_dtype_ops {
    ($t: ident, $g: ident) => {
        impl DTypeOps for $t {
            fn matrix_multiply<A, B, C>(alpha: Self, a: &A, ta: bool, b: &B, tb: bool, beta: Self, c: &mut C)
            where
                A: TensorBase<Self, Dim2>,
                B: TensorBase<Self, Dim2>,
                C: TensorBaseMut<Self, Dim2>,
            {
                let &Dim2(a_rows, a_cols) = a.dims();
                let &Dim2(b_rows, b_cols) = b.dims();
                let &Dim2(_, c_cols) = c.dims();
                let (m, k, rsa, csa) = if ta {
                    (a_cols, a_rows, 1, a_cols as isize)
                } else {
                    (a_rows, a_cols, a_cols as isize, 1)
                };
                let (n, rsb, csb) = if tb {
                    assert_eq!(b_cols, k, "inner dimensions of the product do not match");
                    (b_rows, 1, b_cols as isize)
                } else {
                    assert_eq!(b_rows, k, "inner dimensions of the product do not match");
                    (b_cols, b_cols as isize, 1)
                };
                assert_eq!(c.dims(), &Dim2(m, n), "invalid dimensions for the product");
                // SAFETY: the asserts above guarantee every stride stays inside its buffer
                unsafe {
                    matrixmultiply::$g(
                        m,
                        k,
                        n,
                        alpha,
                        a.as_ref().as_ptr(),
                        rsa,
                        csa,
                        b.as_ref().as_ptr(),
                        rsb,
                        csb,
                        beta,
                        c.as_mut().as_mut_ptr(),
                        c_cols as isize,
                        1,
                    );
                }
            }
        }
    };
}

implement_dtype_ops!(f32, sgemm);
implement_dtype_ops!(f64, dgemm);

#[cfg(test)]
mod test {
    use super::{argmax, DTypeOps};
    use crate::tensor::{Dim2, ITensor, Tensor};

    macro_rules! assert_slice_equal {
        ($a:ident, $b:expr) => {{
            let b = $b;
            if $a.len() != b.len() || !std::iter::zip(&$a, &b).all(|(&i, &j)| (i - j).abs() <= f32::EPSILON) {
                let mismatch: Vec<usize> = std::iter::zip(&$a, &b)
                    .enumerate()
                    .filter(|&(_, (&i, &j))| (i - j).abs() > f32::EPSILON)
                    .map(|(idx, _)| idx)
                    .collect();
                panic!(
                    "slices not equal: left={:?}, right={:?}, mismatched indexes={:?}",
                    &$a, &b, &mismatch
                );
            }
        }};
    }

    #[test]
    fn test_mat_mul() {
        let a = Tensor::from_vec(vec![1., 2., 3., 4., 5., 6.], Dim2(2, 3));
        let b = Tensor::from_vec(vec![7., 8., 9., 10., 11., 12.], Dim2(3, 2));
        let c = Tensor::from_vec(vec![0.5, 1., 1., 0.25], Dim2(2, 2));

        let mut r2x2 = Tensor::filled(0f32, Dim2(2, 2));
        let mut r2x3 = Tensor::filled(0f32, Dim2(2, 3));
        let mut r3x2 = Tensor::filled(0f32, Dim2(3, 2));
        let mut r3x3 = Tensor::filled(0f32, Dim2(3, 3));

        // various combinations of A X B

        r2x2.fill(100.); // existing values should be ignored
        f32::matrix_multiply(1.0, &a, false, &b, false, 0.0, &mut r2x2);
        assert_slice_equal!(r2x2, [58., 64., 139., 154.]);

        r2x2.fill(0.);
        f32::matrix_multiply(0.5, &a, false, &b, false, 0.0, &mut r2x2);
        assert_slice_equal!(r2x2, [29., 32., 69.5, 77.]);

        r2x2.fill(1.);
        f32::matrix_multiply(1.0, &a, false, &b, false, 5.0, &mut r2x2);
        assert_slice_equal!(r2x2, [63., 69., 144., 159.]);

        // B X A

        r3x3.fill(100.);
        f32::matrix_multiply(1.0, &b, false, &a, false, 0.0, &mut r3x3);
        assert_slice_equal!(r3x3, [39., 54., 69., 49., 68., 87., 59., 82., 105.]);

        // C X Bt

        r2x3.fill(100.);
        f32::matrix_multiply(1.0, &c, false, &b, true, 0.0, &mut r2x3);
        assert_slice_equal!(r2x3, [11.5, 14.5, 17.5, 9., 11.5, 14.]);

        // At X C

        r3x2.fill(100.);
        f32::matrix_multiply(1.0, &a, true, &c, false, 0.0, &mut r3x2);
        assert_slice_equal!(r3x2, [4.5, 2., 6., 3.25, 7.5, 4.5]);
    }

    #[test]
    #[should_panic]
    fn test_mat_mul_mismatch() {
        let a = Tensor::filled(1f64, Dim2(2, 3));
        let b = Tensor::filled(1f64, Dim2(2, 3));
        let mut c = Tensor::filled(0f64, Dim2(2, 2));
        f64::matrix_multiply(1.0, &a, false, &b, false, 0.0, &mut c);
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1f32, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[3.0f32, 3.0, 1.0, 3.0]), 0);
        assert_eq!(argmax(&[-1.0f64, f64::NAN, -0.5]), 2);
        assert_eq!(argmax(&[f32::NAN, -3.0, -2.0]), 2);
        assert_eq!(argmax(&[f64::NAN, f64::NAN]), 0);
        assert_eq!(argmax::<f32>(&[]), 0);
    }
}
