//! Owned single-channel integer image in row-major layout (stride == width).
//!
//! This is the in-memory form of the plain-text matrix: `h` rows of `w`
//! integers, nominally in [0, 255]. Coordinates follow the usual image
//! convention, `x` is the column and `y` the row.
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageI32 {
    /// Image width in pixels (number of columns)
    pub w: usize,
    /// Image height in pixels (number of rows)
    pub h: usize,
    /// Number of elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<i32>,
}

impl ImageI32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` when the length does
    /// not match `w × h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<i32>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Widen a packed 8-bit grayscale buffer. Returns `None` when the length
    /// does not match `w × h`.
    pub fn from_gray(w: usize, h: usize, gray: &[u8]) -> Option<Self> {
        Self::from_vec(w, h, gray.iter().copied().map(i32::from).collect())
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> i32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: i32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}

impl ImageView for ImageI32 {
    type Pixel = i32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[i32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[i32]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

impl ImageViewMut for ImageI32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [i32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
