#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod edges;
pub mod error;
pub mod image;
pub mod source;

// The scatter/gather pipeline. Stage types are public so tests and tools can
// drive the shuffle and the aggregators directly.
pub mod mapreduce;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::{AggregationMode, JobConfig};
pub use crate::diagnostics::JobReport;
pub use crate::edges::sobel_magnitude;
pub use crate::error::{Result, SobelError};
pub use crate::mapreduce::SobelJob;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use sobel_mapreduce::prelude::*;
///
/// let text = "3 3\n0 0 0\n0 0 0\n0 0 90\n";
/// let job = SobelJob::new(JobConfig::default().with_map_workers(2)).unwrap();
/// let (edges, report) = job.run_text(text).unwrap();
/// assert_eq!(edges, sobel_magnitude(&parse_matrix(text).unwrap()));
/// assert_eq!(report.pixels_read, 9);
/// ```
pub mod prelude {
    pub use crate::image::io::{format_matrix, parse_matrix};
    pub use crate::image::ImageI32;
    pub use crate::{sobel_magnitude, AggregationMode, JobConfig, SobelJob};
}
