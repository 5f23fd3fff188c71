//! Per-pixel scatter/gather realization of the Sobel filter.
//!
//! The 3×3 stencil is decomposed into additive partial sums:
//!
//! - `emit` (map) turns one input pixel into up to 18 keyed contributions,
//!   one per in-range neighbour and component;
//! - [`shuffle`] sorts and groups contributions by key;
//! - [`aggregate`] (reduce) combines the horizontal and vertical sums of a
//!   pixel into its gradient magnitude;
//! - [`assemble`] writes finished pixels into the output image.
//!
//! [`job::SobelJob`] wires the stages together on a thread pool.

pub mod aggregate;
pub mod assemble;
pub mod emit;
pub mod job;
pub mod key;
pub mod shuffle;

pub use aggregate::{reduce_pixel, AggregatorState, OrderedAggregator, PixelAccumulator};
pub use assemble::ImageAssembler;
pub use emit::emit;
pub use job::SobelJob;
pub use key::{Component, Contribution, ContributionKey, OutputPixel, PixelKey};
pub use shuffle::{key_groups, pixel_groups, KeyGroup, PixelGroup, Shuffle};
