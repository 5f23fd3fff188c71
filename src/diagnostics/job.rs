use super::TimingBreakdown;
use crate::config::AggregationMode;
use serde::Serialize;

/// Counters and timings of one scatter/gather run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub rows: usize,
    pub cols: usize,
    pub mode: AggregationMode,
    pub splits: usize,
    pub map_workers: usize,
    pub reducers: usize,
    /// Pixel records read by all map workers.
    pub pixels_read: usize,
    /// Contributions emitted by all map workers.
    pub contributions: usize,
    /// Groups delivered to the reduce side.
    pub groups: usize,
    /// Interior pixels written to the output.
    pub output_pixels: usize,
    /// Border values computed by the reduce side and dropped.
    pub discarded_border_values: usize,
    pub timing: TimingBreakdown,
}
