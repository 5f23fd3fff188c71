//! Reduce side: combine component sums into gradient magnitudes.
//!
//! Two protocols are provided.
//!
//! - [`OrderedAggregator`] consumes `(row, col, component)` groups from one
//!   globally sorted stream. The first group of a pixel stores `sh^2`; the
//!   second adds `sv^2` and finishes the pixel. It relies on the horizontal
//!   group of every pixel arriving strictly before its vertical group and on
//!   being the only aggregator of the job, so it checks both and reports any
//!   breach as an ordering violation.
//! - [`reduce_pixel`] folds one pixel-keyed group into a [`PixelAccumulator`]
//!   and finishes it in one step. No cross-group state exists, so groups can
//!   be reduced in any order and on any number of workers.
use super::key::{Component, ContributionKey, OutputPixel, PixelKey};
use super::shuffle::{KeyGroup, PixelGroup, Shuffle};
use crate::edges::grad::{combine_squared, magnitude};
use crate::error::{Result, SobelError};
use log::debug;
use std::collections::HashMap;

/// Lifecycle of an [`OrderedAggregator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregatorState {
    Idle,
    Accumulating,
    Finalizing,
}

/// Sequential, single-instance reducer of the ordered protocol.
#[derive(Debug)]
pub struct OrderedAggregator {
    state: AggregatorState,
    /// Squared horizontal sums of pixels still waiting for their vertical group.
    pending: HashMap<PixelKey, i64>,
    last_key: Option<ContributionKey>,
    groups: usize,
    completed: usize,
}

impl OrderedAggregator {
    /// Create the aggregator for a shuffle. The ordered protocol is only sound
    /// with a single reduce partition, so any other shuffle is refused.
    pub fn for_shuffle(shuffle: &Shuffle) -> Result<Self> {
        if shuffle.partitions() != 1 {
            return Err(SobelError::Job(format!(
                "ordered aggregation requires exactly one aggregator, shuffle has {} partitions",
                shuffle.partitions()
            )));
        }
        Ok(Self::new())
    }

    fn new() -> Self {
        Self {
            state: AggregatorState::Idle,
            pending: HashMap::new(),
            last_key: None,
            groups: 0,
            completed: 0,
        }
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    /// Number of pixels waiting for their second group.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn groups_seen(&self) -> usize {
        self.groups
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.state != AggregatorState::Idle {
            return Err(SobelError::Job(format!(
                "aggregator cannot begin from state {:?}",
                self.state
            )));
        }
        self.state = AggregatorState::Accumulating;
        Ok(())
    }

    /// Process one key group. Returns the finished pixel when `group` is the
    /// second (vertical) group of its pixel.
    pub fn reduce(&mut self, group: &KeyGroup) -> Result<Option<OutputPixel>> {
        if self.state != AggregatorState::Accumulating {
            return Err(SobelError::Job(format!(
                "aggregator received group {} in state {:?}",
                group.key, self.state
            )));
        }
        let key = group.key;
        if let Some(last) = self.last_key {
            if key <= last {
                return Err(SobelError::ordering(
                    key.row,
                    key.col,
                    format!("group {key} delivered after {last}"),
                ));
            }
        }
        self.last_key = Some(key);
        self.groups += 1;

        let s = group.sum();
        let squared = s * s;
        let pixel = key.pixel();
        match self.pending.remove(&pixel) {
            None => {
                if key.component != Component::Horizontal {
                    return Err(SobelError::ordering(
                        key.row,
                        key.col,
                        "vertical group arrived without a preceding horizontal group",
                    ));
                }
                self.pending.insert(pixel, squared);
                Ok(None)
            }
            Some(prior) => {
                // Strictly increasing keys make this the vertical group.
                debug_assert_eq!(key.component, Component::Vertical);
                self.completed += 1;
                Ok(Some(OutputPixel {
                    row: key.row,
                    col: key.col,
                    value: combine_squared(prior + squared),
                }))
            }
        }
    }

    /// Close the phase. Every pixel must have received both groups.
    pub fn finish(mut self) -> Result<usize> {
        self.state = AggregatorState::Finalizing;
        debug!(
            "OrderedAggregator::finish groups={} completed={} pending={}",
            self.groups,
            self.completed,
            self.pending.len()
        );
        if let Some(pixel) = self.pending.keys().min() {
            return Err(SobelError::ordering(
                pixel.row,
                pixel.col,
                format!(
                    "only the horizontal group arrived ({} pixels incomplete)",
                    self.pending.len()
                ),
            ));
        }
        Ok(self.completed)
    }
}

/// Two-slot accumulator for one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelAccumulator {
    pub sh: Option<i64>,
    pub sv: Option<i64>,
}

impl PixelAccumulator {
    pub fn add(&mut self, component: Component, value: i64) {
        let slot = match component {
            Component::Horizontal => &mut self.sh,
            Component::Vertical => &mut self.sv,
        };
        *slot = Some(slot.unwrap_or(0) + value);
    }

    pub fn finish(self, pixel: PixelKey) -> Result<OutputPixel> {
        match (self.sh, self.sv) {
            (Some(sh), Some(sv)) => Ok(OutputPixel {
                row: pixel.row,
                col: pixel.col,
                value: magnitude(sh, sv),
            }),
            (sh, _) => {
                let missing = if sh.is_none() { "horizontal" } else { "vertical" };
                Err(SobelError::ordering(
                    pixel.row,
                    pixel.col,
                    format!("no {missing} contribution reached the pixel"),
                ))
            }
        }
    }
}

/// Fold a whole pixel group and finish it.
pub fn reduce_pixel(group: &PixelGroup) -> Result<OutputPixel> {
    group
        .parts
        .iter()
        .fold(PixelAccumulator::default(), |mut acc, &(component, value)| {
            acc.add(component, value);
            acc
        })
        .finish(group.pixel)
}
