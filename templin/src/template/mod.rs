//! Turns a hand-drawn template image into the weight matrix of a linear classifier.
//!
//! The template stacks one square prototype per digit vertically, so after resizing it to
//! a `280 x 28` canvas, tile `i` occupies rows `28 * i..28 * (i + 1)`.

mod normalize;
mod weights;

pub use normalize::*;
pub(crate) use normalize::check_eta;
pub use weights::*;
