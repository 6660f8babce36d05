use crate::backend::Backend;
use crate::bias::Bias;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::template::TemplateWeights;
use crate::tensor::{Dim2, ITensor, Tensor, Tensor1, Tensor2, TensorBase, TensorView2};

/// Linear classifier `scores = x · Wᵀ + b` whose weight rows are template tiles.
#[derive(Debug, Clone)]
pub struct LinearClassifier<B: Backend> {
    backend: B,
    weights: Tensor2<B::Float>,
    bias: Tensor1<B::Float>,
}

impl<B: Backend> LinearClassifier<B> {
    pub fn new(backend: B, weights: &TemplateWeights, bias: &Bias) -> Self {
        let convert = |&v: &f32| B::Float::from_f64(f64::from(v));
        LinearClassifier {
            backend,
            weights: weights.matrix().into_owned().map(convert),
            bias: Tensor1::from_vec_1d(bias.values().iter().map(convert).collect()),
        }
    }

    /// Builds a classifier from a raw `(classes, inputs)` weight matrix and a matching bias.
    pub fn from_tensors(backend: B, weights: Tensor2<B::Float>, bias: Tensor1<B::Float>) -> Result<Self> {
        let classes = weights.dims().rows();
        if bias.len() != classes {
            return Err(Error::BiasLength {
                expected: classes,
                actual: bias.len(),
            });
        }
        Ok(LinearClassifier { backend, weights, bias })
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.weights.dims().cols()
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.weights.dims().rows()
    }

    /// Computes the `(N, classes)` score matrix of a batch of flattened images.
    pub fn scores(&self, images: TensorView2<B::Float>) -> Result<Tensor2<B::Float>> {
        let &Dim2(rows, cols) = images.dims();
        if cols != self.input_size() {
            return Err(Error::shape(
                format!("(N, {}) images", self.input_size()),
                images.dims(),
            ));
        }
        let mut scores = Tensor::zeroed(Dim2(rows, self.num_classes()));
        if rows == 0 {
            return Ok(scores);
        }
        self.backend.matmul(
            B::Float::ONE,
            images,
            false,
            self.weights.view(),
            true,
            B::Float::ZERO,
            &mut scores,
        );
        self.backend.add_row_broadcast(&mut scores, self.bias.view());
        Ok(scores)
    }

    /// Predicted class of every image, the lowest class index wins ties.
    pub fn predict(&self, images: TensorView2<B::Float>) -> Result<Vec<usize>> {
        let scores = self.scores(images)?;
        Ok(self.backend.argmax_rows(scores.view()))
    }
}

impl<B: Backend + Default> LinearClassifier<B> {
    pub fn with_default_backend(weights: &TemplateWeights, bias: &Bias) -> Self {
        Self::new(B::default(), weights, bias)
    }
}
