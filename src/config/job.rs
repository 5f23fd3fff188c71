use crate::error::{Result, SobelError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How the reduce side combines the two component sums of a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Group by pixel and fold both components in one step.
    #[default]
    PixelKeyed,
    /// Group by `(row, col, component)` and combine across two sorted groups
    /// on a single aggregator.
    Ordered,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Threads running the map stage (and pixel-keyed reducers).
    pub map_workers: usize,
    /// Number of input splits; `None` uses one split per map worker.
    pub splits: Option<usize>,
    /// Reduce partitions. Must be 1 in `ordered` mode.
    pub reducers: usize,
    pub mode: AggregationMode,
    /// Optional path receiving the JSON job report.
    pub report: Option<PathBuf>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            map_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            splits: None,
            reducers: 1,
            mode: AggregationMode::default(),
            report: None,
        }
    }
}

impl JobConfig {
    pub fn with_mode(mut self, mode: AggregationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_map_workers(mut self, map_workers: usize) -> Self {
        self.map_workers = map_workers;
        self
    }

    pub fn with_splits(mut self, splits: usize) -> Self {
        self.splits = Some(splits);
        self
    }

    pub fn with_reducers(mut self, reducers: usize) -> Self {
        self.reducers = reducers;
        self
    }

    pub fn split_count(&self) -> usize {
        self.splits.unwrap_or(self.map_workers).max(1)
    }

    /// Check the settings the job cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.map_workers == 0 {
            return Err(SobelError::Job("map_workers must be at least 1".to_string()));
        }
        if self.reducers == 0 {
            return Err(SobelError::Job("reducers must be at least 1".to_string()));
        }
        if self.mode == AggregationMode::Ordered && self.reducers != 1 {
            return Err(SobelError::Job(format!(
                "ordered aggregation needs exactly one reducer, got {}",
                self.reducers
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<JobConfig> {
    let data = fs::read_to_string(path).map_err(|e| SobelError::io(path, e))?;
    let config: JobConfig = serde_json::from_str(&data).map_err(|e| SobelError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    config.validate().map_err(|e| SobelError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(config)
}
