//! Diagnostics produced by a job run.
//!
//! `JobReport` is returned by [`crate::mapreduce::SobelJob`] next to the
//! output image: record counts of every stage plus a timing breakdown. It
//! serializes to camelCase JSON for tooling.

pub mod job;
pub mod timing;

pub use job::JobReport;
pub use timing::{StageTiming, TimingBreakdown};
