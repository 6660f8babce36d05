use crate::bias::Bias;
use crate::template::TemplateWeights;
use crate::tensor::{Dim2, Tensor2};
use crate::{NUM_CLASSES, TILE_EDGE};
use crate::error::Result;
use rand::distributions::Uniform;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::StandardNormal;

pub const BATCH_LG: usize = 10_000;
pub const BATCH_MD: usize = 1000;
pub const BATCH_SM: usize = 100;
const SEED: u64 = 0x8371943;

/// Random standardized images and the `(classes, pixels)` weight matrix they are scored against.
pub fn get_scoring_operands<T>(batch_size: usize) -> [Tensor2<T>; 2]
where
    StandardNormal: Distribution<T>,
{
    let mut rng = StdRng::seed_from_u64(SEED);
    [
        Tensor2::from_distribution(&mut rng, StandardNormal, Dim2(batch_size, TILE_EDGE * TILE_EDGE)),
        Tensor2::from_distribution(&mut rng, StandardNormal, Dim2(NUM_CLASSES, TILE_EDGE * TILE_EDGE)),
    ]
}

/// Template weights in `[-1, 1]` with a seeded random bias.
pub fn get_template_classifier_parts() -> Result<(TemplateWeights, Bias)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let matrix = Tensor2::from_distribution(
        &mut rng,
        Uniform::new_inclusive(-1.0f32, 1.0),
        Dim2(NUM_CLASSES, TILE_EDGE * TILE_EDGE),
    );
    let weights = TemplateWeights::from_matrix(matrix)?;
    Ok((weights, Bias::random(&mut rng)))
}
