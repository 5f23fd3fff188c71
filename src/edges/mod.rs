//! Sobel gradient magnitude computed directly on the whole image.
//!
//! This is the single-process reference filter. Every other realization in
//! the crate (the per-image batch and the per-pixel scatter/gather job) must
//! reproduce its output pixel for pixel.
//!
//! - Interior pixels get `clamp(trunc(sqrt(sh^2 + sv^2)), 0, 255)`.
//! - The outermost ring is fixed at 0; no border replication is done.

pub mod grad;

pub use grad::{magnitude, sobel_components, sobel_magnitude, Kernel3, SOBEL_H, SOBEL_V};
