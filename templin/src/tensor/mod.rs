mod base;
mod debug;
mod dims;
mod iter;
mod owned;
mod view;
#[cfg(feature = "approx")]
mod approx;

pub use base::*;
pub use dims::*;
pub use iter::*;
pub use owned::*;
pub use view::*;

/// Common shape information shared by owned tensors and views
pub trait ITensor<D: Dims> {
    fn len(&self) -> usize;
    fn dims(&self) -> &D;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
