mod backend;
pub(crate) mod math;

pub use backend::*;
pub use math::{argmax, DTypeOps};
