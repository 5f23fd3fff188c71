//! Collect finished pixels into the output image.
use super::key::OutputPixel;
use crate::error::{Result, SobelError};
use crate::image::ImageI32;
use crate::source::Dims;

/// Output image under construction. Border pixels stay 0; values computed for
/// them by the reduce side are dropped.
#[derive(Debug)]
pub struct ImageAssembler {
    dims: Dims,
    image: ImageI32,
    filled: Vec<bool>,
    discarded: usize,
}

impl ImageAssembler {
    pub fn new(dims: Dims) -> Self {
        Self {
            dims,
            image: ImageI32::new(dims.cols, dims.rows),
            filled: vec![false; dims.pixel_count()],
            discarded: 0,
        }
    }

    pub fn place(&mut self, px: OutputPixel) -> Result<()> {
        if px.row >= self.dims.rows || px.col >= self.dims.cols {
            return Err(SobelError::ordering(
                px.row,
                px.col,
                "output pixel lies outside the image",
            ));
        }
        if self.dims.is_border(px.row, px.col) {
            self.discarded += 1;
            return Ok(());
        }
        let idx = self.image.idx(px.col, px.row);
        if std::mem::replace(&mut self.filled[idx], true) {
            return Err(SobelError::ordering(
                px.row,
                px.col,
                "pixel was finalized more than once",
            ));
        }
        self.image.data[idx] = px.value;
        Ok(())
    }

    /// Number of border values that were dropped.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Return the image; every interior pixel must have been placed.
    pub fn finish(self) -> Result<ImageI32> {
        let (rows, cols) = (self.dims.rows, self.dims.cols);
        for row in 1..rows.saturating_sub(1) {
            for col in 1..cols.saturating_sub(1) {
                if !self.filled[row * cols + col] {
                    return Err(SobelError::ordering(
                        row,
                        col,
                        "no output value was computed",
                    ));
                }
            }
        }
        Ok(self.image)
    }
}
