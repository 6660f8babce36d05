pub mod backend;
pub mod bias;
pub mod classifier;
pub mod dataset;
pub mod dtype;
pub mod error;
pub mod pipeline;
pub mod scoring;
pub mod template;
pub mod tensor;
#[doc(hidden)]
pub mod util;

pub use error::{Error, Result};

/// Number of digit classes, which is also the number of tiles stacked in a template image.
pub const NUM_CLASSES: usize = 10;

/// Edge length of a square template tile and of a single MNIST image.
pub const TILE_EDGE: usize = 28;
