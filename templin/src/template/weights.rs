use crate::error::{Error, Result};
use crate::tensor::{Dim2, ITensor, Tensor2, TensorBase, TensorView2};
use crate::NUM_CLASSES;
use image::{GrayImage, Luma};
use std::path::Path;

/// Weight matrix of the template classifier, one flattened tile per class.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateWeights {
    matrix: Tensor2<f32>,
    tile_edge: usize,
}

/// Slices a `(10 * T, T)` canvas into ten `T x T` tiles and flattens each into one row of a
/// `(10, T * T)` matrix.
pub fn extract_weights(canvas: &Tensor2<f32>) -> Result<TemplateWeights> {
    let &Dim2(rows, cols) = canvas.dims();
    if cols == 0 || rows != NUM_CLASSES * cols {
        return Err(Error::shape(
            format!("({}, {cols}) with {NUM_CLASSES} square tiles", NUM_CLASSES * cols),
            canvas.dims(),
        ));
    }
    // tile i is the contiguous band of rows [i * T, (i + 1) * T) in the row-major canvas
    let matrix = canvas.clone().reshape(Dim2(NUM_CLASSES, cols * cols))?;
    Ok(TemplateWeights {
        matrix,
        tile_edge: cols,
    })
}

impl TemplateWeights {
    /// Wraps an existing `(10, T * T)` matrix.
    pub fn from_matrix(matrix: Tensor2<f32>) -> Result<Self> {
        let &Dim2(rows, cols) = matrix.dims();
        let tile_edge = (cols as f64).sqrt().round() as usize;
        if rows != NUM_CLASSES || tile_edge == 0 || tile_edge * tile_edge != cols {
            return Err(Error::shape(
                format!("({NUM_CLASSES}, T * T)"),
                matrix.dims(),
            ));
        }
        Ok(TemplateWeights { matrix, tile_edge })
    }

    #[inline]
    pub fn matrix(&self) -> TensorView2<'_, f32> {
        self.matrix.view()
    }

    #[inline]
    pub fn tile_edge(&self) -> usize {
        self.tile_edge
    }

    /// Number of pixels per tile, i.e. the input width of the classifier.
    #[inline]
    pub fn input_size(&self) -> usize {
        self.tile_edge * self.tile_edge
    }

    #[inline]
    pub fn row(&self, class: usize) -> &[f32] {
        self.matrix.row(class)
    }

    pub fn into_inner(self) -> Tensor2<f32> {
        self.matrix
    }

    /// Renders the weights back into the stacked template layout, mapping [-1, 1] to [0, 255].
    pub fn to_image(&self) -> GrayImage {
        let edge = self.tile_edge as u32;
        GrayImage::from_fn(edge, edge * NUM_CLASSES as u32, |x, y| {
            let w = self.matrix[(y * edge + x) as usize];
            Luma([((w + 1.0) * 127.5).round().clamp(0.0, 255.0) as u8])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| Error::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}
