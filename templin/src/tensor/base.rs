use crate::tensor::{Dims, ITensor, Tensor, TensorIter, TensorIterMut, TensorView};

pub trait TensorBase<T, D: Dims>: ITensor<D> + AsRef<[T]> {
    #[inline]
    fn view(&self) -> TensorView<'_, T, D> {
        TensorView::from_parts(self.as_ref(), *self.dims())
    }

    /// iterates over the sub-tensors along the first axis, e.g. the rows of a matrix
    #[inline]
    fn iter_major_axis(&self) -> TensorIter<'_, T, D::Less> {
        let dims = self.dims();
        TensorIter::new(self.as_ref(), dims.first(), dims.without_first_axis())
    }

    fn into_owned(self) -> Tensor<T, D>
    where
        T: Clone,
        Self: Sized,
    {
        Tensor::from_vec(self.as_ref().to_vec(), *self.dims())
    }
}

pub trait TensorBaseMut<T, D: Dims>: TensorBase<T, D> + AsMut<[T]> {
    #[inline]
    fn iter_major_axis_mut(&mut self) -> TensorIterMut<'_, T, D::Less> {
        let dims = *self.dims();
        TensorIterMut::new(self.as_mut(), dims.first(), dims.without_first_axis())
    }
}
