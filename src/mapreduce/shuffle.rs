//! Shuffle: partition, sort and group map output by key.
//!
//! The map side sorts its output and cuts it into one run per reduce
//! partition ([`Shuffle::spill`]). The reduce side k-way merges the runs of a
//! partition into one globally sorted stream ([`Shuffle::merge`]), which is
//! then grouped either by full [`ContributionKey`] (ordered protocol) or by
//! [`PixelKey`] (pixel-keyed protocol). Merging is deterministic: equal keys
//! never reorder relative to each other across runs, and the group contents
//! are summed, so the value order within a group does not matter.
use super::key::{Component, Contribution, ContributionKey, PixelKey};
use crate::error::{Result, SobelError};
use crate::source::Dims;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::iter::Peekable;
use std::marker::PhantomData;

/// All partial values of one `(row, col, component)` key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGroup {
    pub key: ContributionKey,
    pub values: Vec<i64>,
}

impl KeyGroup {
    pub fn sum(&self) -> i64 {
        self.values.iter().sum()
    }
}

/// All tagged partial values of one output pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGroup {
    pub pixel: PixelKey,
    pub parts: Vec<(Component, i64)>,
}

/// Partitioning of the key space over reduce workers.
#[derive(Clone, Copy, Debug)]
pub struct Shuffle {
    partitions: usize,
    dims: Dims,
}

impl Shuffle {
    pub fn new(partitions: usize, dims: Dims) -> Result<Self> {
        if partitions == 0 {
            return Err(SobelError::Job(
                "shuffle needs at least one reduce partition".to_string(),
            ));
        }
        Ok(Self { partitions, dims })
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Partition of a key. Both components of a pixel always share a partition.
    #[inline]
    pub fn partition_of(&self, key: &ContributionKey) -> usize {
        (key.row * self.dims.cols + key.col) % self.partitions
    }

    /// Map-side spill: sort one worker's output and cut it per partition.
    pub fn spill(&self, mut contributions: Vec<Contribution>) -> Vec<Vec<Contribution>> {
        contributions.sort_by_key(|c| c.key);
        if self.partitions == 1 {
            return vec![contributions];
        }
        let mut runs = vec![Vec::new(); self.partitions];
        for c in contributions {
            runs[self.partition_of(&c.key)].push(c);
        }
        runs
    }

    /// Reduce-side merge of sorted runs into one sorted stream.
    pub fn merge(runs: Vec<Vec<Contribution>>) -> Vec<Contribution> {
        let total = runs.iter().map(Vec::len).sum();
        let mut merged = Vec::with_capacity(total);
        let mut iters: Vec<_> = runs.into_iter().map(Vec::into_iter).collect();
        let mut heap = BinaryHeap::with_capacity(iters.len());
        for (run, it) in iters.iter_mut().enumerate() {
            if let Some(c) = it.next() {
                heap.push(Reverse((c.key, run, c.value)));
            }
        }
        while let Some(Reverse((key, run, value))) = heap.pop() {
            merged.push(Contribution { key, value });
            if let Some(c) = iters[run].next() {
                heap.push(Reverse((c.key, run, c.value)));
            }
        }
        merged
    }
}

/// Group a sorted contribution stream by full key.
pub fn key_groups<I>(sorted: I) -> impl Iterator<Item = KeyGroup>
where
    I: IntoIterator<Item = Contribution>,
{
    GroupBy::new(sorted.into_iter(), |c: &Contribution| c.key).map(|(key, items)| KeyGroup {
        key,
        values: items.into_iter().map(|c| c.value).collect(),
    })
}

/// Group a sorted contribution stream by pixel, keeping the component tags.
pub fn pixel_groups<I>(sorted: I) -> impl Iterator<Item = PixelGroup>
where
    I: IntoIterator<Item = Contribution>,
{
    GroupBy::new(sorted.into_iter(), |c: &Contribution| c.key.pixel()).map(|(pixel, items)| {
        PixelGroup {
            pixel,
            parts: items
                .into_iter()
                .map(|c| (c.key.component, c.value))
                .collect(),
        }
    })
}

/// Runs of adjacent items sharing a key.
struct GroupBy<I: Iterator, K, F> {
    inner: Peekable<I>,
    key_fn: F,
    _key: PhantomData<K>,
}

impl<I: Iterator, K, F> GroupBy<I, K, F> {
    fn new(inner: I, key_fn: F) -> Self {
        Self {
            inner: inner.peekable(),
            key_fn,
            _key: PhantomData,
        }
    }
}

impl<I, K, F> Iterator for GroupBy<I, K, F>
where
    I: Iterator,
    K: PartialEq,
    F: FnMut(&I::Item) -> K,
{
    type Item = (K, Vec<I::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.inner.next()?;
        let key = (self.key_fn)(&first);
        let mut items = vec![first];
        let key_fn = &mut self.key_fn;
        while let Some(item) = self.inner.next_if(|next| key_fn(next) == key) {
            items.push(item);
        }
        Some((key, items))
    }
}
