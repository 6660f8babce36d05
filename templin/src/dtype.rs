use num_traits::{Float, Num, NumAssignOps};
use std::fmt::Debug;

/// Element type of tensors handled by the numeric kernels.
pub trait DType: 'static + Sized + Copy + Debug + PartialOrd + Num + NumAssignOps {
    const ZERO: Self;
    const ONE: Self;
    fn from_f64(val: f64) -> Self;
}

pub trait DTypeFloat: DType + Float {}

macro_rules! impl_dtype {
    ($ty:ty, $one:expr, $zero:expr $(,$other_trait:ty)*) => {
        impl DType for $ty {
            const ZERO: Self = $zero;
            const ONE: Self = $one;
            #[inline]
            fn from_f64(val: f64) -> Self {
                val as $ty
            }
        }
        $(
        impl $other_trait for $ty {}
        )*
    };
}

impl_dtype!(f32, 1.0, 0.0, DTypeFloat);
impl_dtype!(f64, 1.0, 0.0, DTypeFloat);
