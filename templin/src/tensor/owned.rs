use crate::error::{Error, Result};
use crate::tensor::{Dim1, Dim2, Dim3, Dims, ITensor, TensorBase, TensorBaseMut};
use num_traits::Zero;
use rand::distributions::Distribution;
use rand::Rng;
use std::ops::{Index, IndexMut, Range};
use std::slice::{Iter, IterMut};
use std::vec::IntoIter;

/// Owned, row-major tensor
#[derive(Clone, PartialEq)]
pub struct Tensor<T, D: Dims> {
    data: Vec<T>,
    dims: D,
}

pub type Tensor1<T> = Tensor<T, Dim1>;
pub type Tensor2<T> = Tensor<T, Dim2>;
pub type Tensor3<T> = Tensor<T, Dim3>;

impl<T, D: Dims> Tensor<T, D> {
    pub fn from_vec(data: Vec<T>, dims: D) -> Self {
        assert_eq!(
            data.len(),
            dims.tensor_len(),
            "Mismatched data length {} and dimension {}",
            data.len(),
            dims
        );
        Tensor { data, dims }
    }

    pub fn try_from_vec(data: Vec<T>, dims: D) -> Result<Self> {
        if data.len() != dims.tensor_len() {
            return Err(Error::shape(
                format!("{} elements for dims {dims}", dims.tensor_len()),
                format!("{} elements", data.len()),
            ));
        }
        Ok(Tensor { data, dims })
    }

    pub fn from_distribution<R, S>(rng: &mut R, dist: S, dims: D) -> Self
    where
        R: Rng,
        S: Distribution<T>,
    {
        let data: Vec<T> = dist.sample_iter(rng).take(dims.tensor_len()).collect();
        Tensor { data, dims }
    }

    /// reinterprets the row-major buffer with new dimensions of the same length
    pub fn reshape<E: Dims>(self, dims: E) -> Result<Tensor<T, E>> {
        if self.data.len() != dims.tensor_len() {
            return Err(Error::shape(
                format!("dims with {} elements", self.data.len()),
                dims,
            ));
        }
        Ok(Tensor { data: self.data, dims })
    }

    pub fn map<U, F>(&self, f: F) -> Tensor<U, D>
    where
        F: FnMut(&T) -> U,
    {
        Tensor {
            data: self.data.iter().map(f).collect(),
            dims: self.dims,
        }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.data.iter_mut()
    }
}

impl<T: Clone, D: Dims> Tensor<T, D> {
    pub fn filled(value: T, dims: D) -> Self {
        Tensor {
            data: vec![value; dims.tensor_len()],
            dims,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// copies the sub-tensors `range` along the first axis into a new tensor
    pub fn slice_major(&self, range: Range<usize>) -> Result<Self> {
        let first = self.dims.first();
        if range.start > range.end || range.end > first {
            return Err(Error::shape(
                format!("range within 0..{first}"),
                format!("{}..{}", range.start, range.end),
            ));
        }
        let stride = self.dims.without_first_axis().tensor_len();
        let data = self.data[range.start * stride..range.end * stride].to_vec();
        Ok(Tensor {
            data,
            dims: self.dims.with_resized_first_axis(range.len()),
        })
    }
}

impl<T: Zero + Clone, D: Dims> Tensor<T, D> {
    #[inline]
    pub fn zeroed(dims: D) -> Self {
        Self::filled(T::zero(), dims)
    }
}

impl<T> Tensor1<T> {
    pub fn from_vec_1d(data: Vec<T>) -> Self {
        let len = data.len();
        Tensor {
            data,
            dims: Dim1(len),
        }
    }
}

impl<T> Tensor2<T> {
    pub fn from_vec_2d<const N: usize>(rows: Vec<[T; N]>) -> Self {
        let dims = Dim2(rows.len(), N);
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Tensor { data, dims }
    }

    #[inline]
    pub fn row(&self, index: usize) -> &[T] {
        let cols = self.dims.cols();
        &self.data[index * cols..(index + 1) * cols]
    }
}

impl<T, D: Dims> ITensor<D> for Tensor<T, D> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }
    #[inline]
    fn dims(&self) -> &D {
        &self.dims
    }
}

impl<T, D: Dims> AsRef<[T]> for Tensor<T, D> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T, D: Dims> AsMut<[T]> for Tensor<T, D> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T, D: Dims> TensorBase<T, D> for Tensor<T, D> {
    #[inline]
    fn into_owned(self) -> Tensor<T, D> {
        self
    }
}

impl<T, D: Dims> TensorBaseMut<T, D> for Tensor<T, D> {}

impl<T, D: Dims> Index<usize> for Tensor<T, D> {
    type Output = T;
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T, D: Dims> IndexMut<usize> for Tensor<T, D> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<T> Index<[usize; 2]> for Tensor2<T> {
    type Output = T;
    #[inline]
    fn index(&self, [row, col]: [usize; 2]) -> &Self::Output {
        debug_assert!(col < self.dims.cols());
        &self.data[row * self.dims.cols() + col]
    }
}

impl<T> IndexMut<[usize; 2]> for Tensor2<T> {
    #[inline]
    fn index_mut(&mut self, [row, col]: [usize; 2]) -> &mut Self::Output {
        debug_assert!(col < self.dims.cols());
        let cols = self.dims.cols();
        &mut self.data[row * cols + col]
    }
}

impl<'a, T, D: Dims> IntoIterator for &'a Tensor<T, D> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T, D: Dims> IntoIterator for &'a mut Tensor<T, D> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

impl<T, D: Dims> IntoIterator for Tensor<T, D> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[macro_export]
macro_rules! tensor {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {
        $crate::tensor::Tensor2::from_vec_2d(vec![$([$($x,)*],)*])
    };
    ($($x:expr),* $(,)*) => {
        $crate::tensor::Tensor1::from_vec_1d(vec![$($x,)*])
    };
}
