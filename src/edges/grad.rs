//! Sobel kernels and the direct 3×3 convolution.
//!
//! - `SOBEL_H` responds to horizontal intensity changes, `SOBEL_V` to vertical.
//! - Kernel cell `[r][c]` weighs the pixel at offset `(r - 1, c - 1)` from the
//!   output position.
//!
//! Complexity: O(rows·cols); memory: one output buffer.
use crate::image::{ImageI32, ImageView, ImageViewMut};

pub type Kernel3 = [[i32; 3]; 3];

pub const SOBEL_H: Kernel3 = [[1, 0, -1], [2, 0, -2], [1, 0, -1]];
pub const SOBEL_V: Kernel3 = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

/// Euclidean combination of the two component sums, clamped to [0, 255] and
/// truncated toward zero.
#[inline]
pub fn magnitude(sh: i64, sv: i64) -> i32 {
    combine_squared(sh * sh + sv * sv)
}

/// Finish a magnitude from an already combined `sh^2 + sv^2`.
#[inline]
pub(crate) fn combine_squared(sum_sq: i64) -> i32 {
    let m = (sum_sq as f64).sqrt();
    m.clamp(0.0, 255.0) as i32
}

/// Direct horizontal and vertical sums at an interior pixel.
///
/// Panics if `(row, col)` has no full 3×3 neighbourhood.
pub fn sobel_components(image: &ImageI32, row: usize, col: usize) -> (i64, i64) {
    assert!(
        row >= 1 && col >= 1 && row + 1 < image.h && col + 1 < image.w,
        "({row}, {col}) is not an interior pixel of a {}x{} image",
        image.h,
        image.w
    );
    let rows = [image.row(row - 1), image.row(row), image.row(row + 1)];
    let mut sum_h = 0i64;
    let mut sum_v = 0i64;
    for (ky, yy_row) in rows.iter().enumerate() {
        let kh_row = &SOBEL_H[ky];
        let kv_row = &SOBEL_V[ky];
        for kx in 0..3 {
            let sample = i64::from(yy_row[col + kx - 1]);
            sum_h += sample * i64::from(kh_row[kx]);
            sum_v += sample * i64::from(kv_row[kx]);
        }
    }
    (sum_h, sum_v)
}

/// Sobel magnitude of a whole image with a zero border.
pub fn sobel_magnitude(image: &ImageI32) -> ImageI32 {
    let (w, h) = (image.w, image.h);
    let mut out = ImageI32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let out_row = out.row_mut(y);
        for x in 1..w - 1 {
            let (sh, sv) = sobel_components(image, y, x);
            out_row[x] = magnitude(sh, sv);
        }
    }
    out
}
