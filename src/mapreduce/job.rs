//! In-process job runner for the per-pixel scatter/gather filter.
//!
//! Stages, in order:
//! 1. split the input into token-aligned byte ranges;
//! 2. map every split on a `rayon` pool, emitting contributions and spilling
//!    them sorted per reduce partition;
//! 3. merge each partition's runs into one sorted stream;
//! 4. reduce, either on one ordered aggregator or per pixel group;
//! 5. assemble the output image with a zero border.
//!
//! Any stage failure fails the whole job; nothing is retried.
//!
//! ```no_run
//! use sobel_mapreduce::config::JobConfig;
//! use sobel_mapreduce::mapreduce::SobelJob;
//! use std::path::Path;
//!
//! # fn example() -> sobel_mapreduce::Result<()> {
//! let job = SobelJob::new(JobConfig::default().with_map_workers(4))?;
//! let report = job.run_file(Path::new("fox.txt"), Path::new("fox_filtered.txt"))?;
//! println!("{} contributions in {:.1} ms", report.contributions, report.timing.total_ms);
//! # Ok(())
//! # }
//! ```
use super::aggregate::{reduce_pixel, OrderedAggregator};
use super::assemble::ImageAssembler;
use super::emit::{emit, MAX_CONTRIBUTIONS_PER_PIXEL};
use super::key::{Contribution, OutputPixel};
use super::shuffle::{key_groups, pixel_groups, Shuffle};
use crate::config::{AggregationMode, JobConfig};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{JobReport, TimingBreakdown};
use crate::error::{Result, SobelError};
use crate::image::io::{write_json_file, write_matrix};
use crate::image::ImageI32;
use crate::source::{InputSplit, PixelSource};
use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Output of one map task: sorted runs, one per reduce partition.
struct MapOutput {
    runs: Vec<Vec<Contribution>>,
    pixels: usize,
    contributions: usize,
}

/// Counters of the reduce stage.
struct ReduceOutput {
    pixels: Vec<OutputPixel>,
    groups: usize,
}

pub struct SobelJob {
    config: JobConfig,
    pool: ThreadPool,
}

impl SobelJob {
    /// Validate the configuration and create the worker pool.
    pub fn new(config: JobConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.map_workers)
            .thread_name(|i| format!("sobel-map-{i}"))
            .build()
            .map_err(|e| SobelError::Job(format!("failed to start worker pool: {e}")))?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Filter the matrix at `input` into `output` and write the report if the
    /// configuration asks for one.
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<JobReport> {
        let text = fs::read_to_string(input).map_err(|e| SobelError::io(input, e))?;
        let (image, report) = self.run_text(&text)?;
        write_matrix(&image, output)?;
        if let Some(report_path) = &self.config.report {
            write_json_file(report_path, &report)?;
        }
        info!(
            "SobelJob wrote {} ({}x{}) in {:.1} ms",
            output.display(),
            report.rows,
            report.cols,
            report.timing.total_ms
        );
        Ok(report)
    }

    /// Filter a serialized matrix held in memory.
    pub fn run_text(&self, text: &str) -> Result<(ImageI32, JobReport)> {
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let split_start = Instant::now();
        let source = PixelSource::new(text)?;
        let dims = source.dims();
        let splits = source.splits(self.config.split_count())?;
        let shuffle = Shuffle::new(self.config.reducers, dims)?;
        timing.record_since("split", split_start);
        debug!(
            "SobelJob::run start {}x{} splits={} workers={} reducers={} mode={:?}",
            dims.rows,
            dims.cols,
            splits.len(),
            self.config.map_workers,
            shuffle.partitions(),
            self.config.mode
        );

        let map_start = Instant::now();
        let mapped: Vec<MapOutput> = self.pool.install(|| {
            splits
                .par_iter()
                .map(|split| map_split(&source, split, &shuffle))
                .collect::<Result<Vec<_>>>()
        })?;
        timing.record_since("map", map_start);
        let pixels_read: usize = mapped.iter().map(|m| m.pixels).sum();
        let contributions: usize = mapped.iter().map(|m| m.contributions).sum();

        let shuffle_start = Instant::now();
        let mut per_partition: Vec<Vec<Vec<Contribution>>> =
            (0..shuffle.partitions()).map(|_| Vec::new()).collect();
        for output in mapped {
            for (partition, run) in output.runs.into_iter().enumerate() {
                per_partition[partition].push(run);
            }
        }
        let merged: Vec<Vec<Contribution>> = self
            .pool
            .install(|| per_partition.into_par_iter().map(Shuffle::merge).collect());
        timing.record_since("shuffle", shuffle_start);

        let reduce_start = Instant::now();
        let reduced = match self.config.mode {
            AggregationMode::Ordered => reduce_ordered(&shuffle, merged)?,
            AggregationMode::PixelKeyed => self.reduce_pixel_keyed(merged)?,
        };
        timing.record_since("reduce", reduce_start);

        let assemble_start = Instant::now();
        let mut assembler = ImageAssembler::new(dims);
        let output_values = reduced.pixels.len();
        for px in reduced.pixels {
            assembler.place(px)?;
        }
        let discarded = assembler.discarded();
        let image = assembler.finish()?;
        timing.record_since("assemble", assemble_start);
        timing.total_ms = elapsed_ms(total_start);

        let report = JobReport {
            rows: dims.rows,
            cols: dims.cols,
            mode: self.config.mode,
            splits: splits.len(),
            map_workers: self.config.map_workers,
            reducers: shuffle.partitions(),
            pixels_read,
            contributions,
            groups: reduced.groups,
            output_pixels: output_values - discarded,
            discarded_border_values: discarded,
            timing,
        };
        debug!(
            "SobelJob::run done pixels={} contributions={} groups={} total_ms={:.3}",
            report.pixels_read, report.contributions, report.groups, report.timing.total_ms
        );
        Ok((image, report))
    }

    fn reduce_pixel_keyed(&self, merged: Vec<Vec<Contribution>>) -> Result<ReduceOutput> {
        let partitions: Vec<ReduceOutput> = self.pool.install(|| {
            merged
                .into_par_iter()
                .map(|run| -> Result<ReduceOutput> {
                    let mut groups = 0usize;
                    let pixels = pixel_groups(run)
                        .map(|group| {
                            groups += 1;
                            reduce_pixel(&group)
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Ok(ReduceOutput { pixels, groups })
                })
                .collect::<Result<Vec<_>>>()
        })?;
        Ok(partitions.into_iter().fold(
            ReduceOutput {
                pixels: Vec::new(),
                groups: 0,
            },
            |mut acc, part| {
                acc.pixels.extend(part.pixels);
                acc.groups += part.groups;
                acc
            },
        ))
    }
}

fn map_split(source: &PixelSource<'_>, split: &InputSplit, shuffle: &Shuffle) -> Result<MapOutput> {
    let dims = source.dims();
    let mut reader = source.reader(split);
    let mut contributions = Vec::with_capacity(split.pixel_count * MAX_CONTRIBUTIONS_PER_PIXEL);
    for record in reader.by_ref() {
        contributions.extend(emit(record?, dims));
    }
    debug!(
        "map split first_pixel={} pixels={} progress={:.2} contributions={}",
        split.first_pixel,
        reader.consumed(),
        reader.progress(),
        contributions.len()
    );
    let count = contributions.len();
    Ok(MapOutput {
        runs: shuffle.spill(contributions),
        pixels: reader.consumed(),
        contributions: count,
    })
}

/// Sequential reduce on the single ordered aggregator.
fn reduce_ordered(shuffle: &Shuffle, merged: Vec<Vec<Contribution>>) -> Result<ReduceOutput> {
    let mut aggregator = OrderedAggregator::for_shuffle(shuffle)?;
    aggregator.begin()?;
    let mut pixels = Vec::new();
    for group in key_groups(merged.into_iter().flatten()) {
        if let Some(px) = aggregator.reduce(&group)? {
            pixels.push(px);
        }
    }
    let groups = aggregator.groups_seen();
    aggregator.finish()?;
    Ok(ReduceOutput { pixels, groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::sobel_magnitude;
    use crate::image::io::{format_matrix, parse_matrix};

    fn ramp(rows: usize, cols: usize) -> ImageI32 {
        let data = (0..rows * cols)
            .map(|i| ((i * 37 + (i / cols) * 11) % 256) as i32)
            .collect();
        ImageI32::from_vec(cols, rows, data).unwrap()
    }

    #[test]
    fn both_modes_match_the_reference() {
        let image = ramp(7, 9);
        let text = format_matrix(&image);
        let expected = sobel_magnitude(&image);
        for mode in [AggregationMode::Ordered, AggregationMode::PixelKeyed] {
            let job = SobelJob::new(
                JobConfig::default()
                    .with_mode(mode)
                    .with_map_workers(3)
                    .with_splits(5),
            )
            .unwrap();
            let (out, report) = job.run_text(&text).unwrap();
            assert_eq!(out, expected, "mode {mode:?}");
            assert_eq!(report.pixels_read, 63);
            assert_eq!(report.output_pixels, 5 * 7);
        }
    }

    #[test]
    fn report_counts_groups_per_mode() {
        let text = format_matrix(&ramp(4, 4));
        let ordered = SobelJob::new(JobConfig::default().with_mode(AggregationMode::Ordered))
            .unwrap()
            .run_text(&text)
            .unwrap()
            .1;
        let keyed = SobelJob::new(JobConfig::default().with_reducers(3))
            .unwrap()
            .run_text(&text)
            .unwrap()
            .1;
        assert_eq!(ordered.groups, 2 * 16);
        assert_eq!(keyed.groups, 16);
        assert_eq!(ordered.contributions, keyed.contributions);
        // 4 corner pixels x 8 + 8 edge pixels x 12 + 4 interior pixels x 18
        assert_eq!(ordered.contributions, 32 + 96 + 72);
        assert_eq!(ordered.discarded_border_values, 12);
        assert!(ordered.timing.stage("reduce").is_some());
    }

    #[test]
    fn malformed_input_fails_the_job() {
        let job = SobelJob::new(JobConfig::default()).unwrap();
        let err = job.run_text("3 3\n1 2 3\n").unwrap_err();
        assert!(matches!(err, SobelError::MalformedInput { .. }));
    }

    #[test]
    fn invalid_config_is_refused_up_front() {
        let config = JobConfig::default()
            .with_mode(AggregationMode::Ordered)
            .with_reducers(2);
        assert!(matches!(SobelJob::new(config), Err(SobelError::Job(_))));
    }

    #[test]
    fn run_file_writes_output_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out/edges.txt");
        let report_path = dir.path().join("report.json");
        fs::write(&input, format_matrix(&ramp(5, 6))).unwrap();

        let mut config = JobConfig::default();
        config.report = Some(report_path.clone());
        let report = SobelJob::new(config).unwrap().run_file(&input, &output).unwrap();

        let written = parse_matrix(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, sobel_magnitude(&ramp(5, 6)));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(json["pixelsRead"], 30);
        assert_eq!(json["mode"], "pixel_keyed");
        assert_eq!(report.rows, 5);
    }
}
