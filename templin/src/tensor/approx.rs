use crate::tensor::{Dims, ITensor, Tensor, TensorView};
use approx::{AbsDiffEq, RelativeEq};
use std::iter::zip;

macro_rules! impl_tensor_approx {
    ($type_name: ident $(, $l: lifetime )?) => {
        impl<$($l,)? T: AbsDiffEq, D: Dims> AbsDiffEq<Tensor<T, D>> for $type_name<$($l,)? T, D>
        where
            T::Epsilon: Copy,
        {
            type Epsilon = T::Epsilon;
            fn default_epsilon() -> Self::Epsilon {
                T::default_epsilon()
            }
            fn abs_diff_eq(&self, other: &Tensor<T, D>, epsilon: Self::Epsilon) -> bool {
                self.dims() == other.dims()
                    && zip(self.as_ref(), other.as_ref()).all(|(a, b)| T::abs_diff_eq(a, b, epsilon))
            }
        }

        impl<$($l,)? T: RelativeEq, D: Dims> RelativeEq<Tensor<T, D>> for $type_name<$($l,)? T, D>
        where
            T::Epsilon: Copy,
        {
            fn default_max_relative() -> Self::Epsilon {
                T::default_max_relative()
            }
            fn relative_eq(&self, other: &Tensor<T, D>, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
                self.dims() == other.dims()
                    && zip(self.as_ref(), other.as_ref())
                        .all(|(a, b)| T::relative_eq(a, b, epsilon, max_relative))
            }
        }
    };
}

impl_tensor_approx!(Tensor);
impl_tensor_approx!(TensorView, 'a);

#[cfg(test)]
mod test {
    use crate::tensor;
    use crate::tensor::{Dim2, Tensor, TensorBase};
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq};

    #[test]
    fn test_tensor_approx() {
        let a = tensor![[1.0f32, 2.0], [3.0, 4.0]];
        let b = tensor![[1.0f32, 2.0 + 1e-7], [3.0, 4.0 - 1e-7]];
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        assert_relative_eq!(a.view(), b);
        assert_abs_diff_ne!(a, Tensor::zeroed(Dim2(2, 2)));
        // equal data with different dims is never approximately equal
        assert_abs_diff_ne!(a, Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], Dim2(4, 1)));
    }
}
