//! JSON configuration for the scatter/gather job.

pub mod job;

pub use job::{load_config, AggregationMode, JobConfig};
