use crate::error::{Error, Result};
use crate::tensor::{Dim1, ITensor, Tensor, Tensor1, TensorBase, TensorView1};
use crate::NUM_CLASSES;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-class offset added to the template scores.
#[derive(Clone, Debug, PartialEq)]
pub struct Bias(Tensor1<f32>);

impl Bias {
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.len() != NUM_CLASSES {
            return Err(Error::BiasLength {
                expected: NUM_CLASSES,
                actual: values.len(),
            });
        }
        Ok(Bias(Tensor1::from_vec_1d(values)))
    }

    pub fn zeros() -> Self {
        Bias(Tensor::zeroed(Dim1(NUM_CLASSES)))
    }

    /// Draws every class offset from a standard normal distribution.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Bias(Tensor::from_distribution(rng, StandardNormal, Dim1(NUM_CLASSES)))
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        self.0.as_ref()
    }

    #[inline]
    pub fn view(&self) -> TensorView1<'_, f32> {
        self.0.view()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Where a pipeline run takes its bias from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BiasSource {
    Fixed(Vec<f32>),
    Zero,
    /// Standard normal samples, reproducible when seeded
    Random { seed: Option<u64> },
}

impl Default for BiasSource {
    fn default() -> Self {
        BiasSource::Random { seed: None }
    }
}

impl BiasSource {
    pub fn resolve(&self) -> Result<Bias> {
        match self {
            BiasSource::Fixed(values) => Bias::new(values.clone()),
            BiasSource::Zero => Ok(Bias::zeros()),
            &BiasSource::Random { seed: Some(seed) } => Ok(Bias::random(&mut StdRng::seed_from_u64(seed))),
            BiasSource::Random { seed: None } => Ok(Bias::random(&mut StdRng::from_entropy())),
        }
    }
}
