use crate::tensor::{Dims, TensorView, TensorViewMut};

/// Iterator over consecutive equally sized sub-tensors of a row-major buffer
pub struct TensorIter<'a, T, D: Dims> {
    data: &'a [T],
    remaining: usize,
    out_dims: D,
}

impl<'a, T, D: Dims> TensorIter<'a, T, D> {
    pub(super) fn new(data: &'a [T], count: usize, out_dims: D) -> Self {
        debug_assert_eq!(data.len(), count * out_dims.tensor_len());
        TensorIter {
            data,
            remaining: count,
            out_dims,
        }
    }
}

impl<'a, T, D: Dims> Iterator for TensorIter<'a, T, D> {
    type Item = TensorView<'a, T, D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (head, tail) = self.data.split_at(self.out_dims.tensor_len());
        self.data = tail;
        self.remaining -= 1;
        Some(TensorView::from_parts(head, self.out_dims))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, D: Dims> ExactSizeIterator for TensorIter<'a, T, D> {}

pub struct TensorIterMut<'a, T, D: Dims> {
    data: &'a mut [T],
    remaining: usize,
    out_dims: D,
}

impl<'a, T, D: Dims> TensorIterMut<'a, T, D> {
    pub(super) fn new(data: &'a mut [T], count: usize, out_dims: D) -> Self {
        debug_assert_eq!(data.len(), count * out_dims.tensor_len());
        TensorIterMut {
            data,
            remaining: count,
            out_dims,
        }
    }
}

impl<'a, T, D: Dims> Iterator for TensorIterMut<'a, T, D> {
    type Item = TensorViewMut<'a, T, D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let data = std::mem::take(&mut self.data);
        let (head, tail) = data.split_at_mut(self.out_dims.tensor_len());
        self.data = tail;
        self.remaining -= 1;
        Some(TensorViewMut::from_parts(head, self.out_dims))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, D: Dims> ExactSizeIterator for TensorIterMut<'a, T, D> {}

#[cfg(test)]
mod test {
    use crate::tensor::{Dim2, Dim3, ITensor, Tensor, TensorBase, TensorBaseMut};

    #[test]
    fn test_iter_rows() {
        let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], Dim2(3, 2));
        let rows: Vec<Vec<i32>> = t.iter_major_axis().map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(t.iter_major_axis().len(), 3);
    }

    #[test]
    fn test_iter_zero_width_rows() {
        let t: Tensor<i32, Dim2> = Tensor::from_vec(vec![], Dim2(4, 0));
        assert_eq!(t.iter_major_axis().count(), 4);
        assert!(t.iter_major_axis().all(|r| r.is_empty()));
    }

    #[test]
    fn test_iter_3d() {
        let t = Tensor::from_vec((0..12).collect(), Dim3(3, 2, 2));
        let second = t.iter_major_axis().nth(1).unwrap();
        assert_eq!(second.dims(), &Dim2(2, 2));
        assert_eq!(&*second, &[4, 5, 6, 7]);
    }

    #[test]
    fn test_iter_mut() {
        let mut t = Tensor::from_vec(vec![1, 2, 3, 4], Dim2(2, 2));
        for (i, mut row) in t.iter_major_axis_mut().enumerate() {
            row.iter_mut().for_each(|x| *x *= 10 * (i as i32 + 1));
        }
        assert_eq!(t.as_ref(), &[10, 20, 60, 80]);
    }
}
