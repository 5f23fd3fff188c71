//! Map side: scatter one pixel into keyed partial Sobel sums.
//!
//! A source pixel at offset `(di, dj)` from a target sits in kernel cell
//! `[1 - di][1 - dj]` relative to that target, so every in-range target of the
//! 3×3 neighbourhood receives `value * SOBEL_H[1-di][1-dj]` as its horizontal
//! part and `value * SOBEL_V[1-di][1-dj]` as its vertical part. Zero weights
//! are emitted too, which guarantees each in-range target sees both
//! components.
use super::key::{Component, Contribution, ContributionKey};
use crate::edges::{SOBEL_H, SOBEL_V};
use crate::source::{Dims, PixelRecord};

/// Upper bound of contributions produced by one pixel.
pub const MAX_CONTRIBUTIONS_PER_PIXEL: usize = 18;

const OFFSETS: [(isize, isize); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Contributions of `pixel` to every in-range neighbour (itself included).
pub fn emit(pixel: PixelRecord, dims: Dims) -> impl Iterator<Item = Contribution> {
    let value = i64::from(pixel.value);
    OFFSETS
        .into_iter()
        .filter_map(move |(di, dj)| {
            let row = pixel.row as isize + di;
            let col = pixel.col as isize + dj;
            dims.contains(row, col)
                .then_some((row as usize, col as usize, di, dj))
        })
        .flat_map(move |(row, col, di, dj)| {
            let ki = (1 - di) as usize;
            let kj = (1 - dj) as usize;
            [
                Contribution {
                    key: ContributionKey::new(row, col, Component::Horizontal),
                    value: value * i64::from(SOBEL_H[ki][kj]),
                },
                Contribution {
                    key: ContributionKey::new(row, col, Component::Vertical),
                    value: value * i64::from(SOBEL_V[ki][kj]),
                },
            ]
        })
}
