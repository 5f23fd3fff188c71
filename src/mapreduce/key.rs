//! Keys and values exchanged between the map and reduce sides.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which Sobel sum a partial value belongs to.
///
/// Variant order is the key order: horizontal groups sort before vertical
/// groups of the same pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Component {
    Horizontal,
    Vertical,
}

impl Component {
    pub fn tag(self) -> char {
        match self {
            Component::Horizontal => 'H',
            Component::Vertical => 'V',
        }
    }
}

/// Output pixel position; the grouping key of the pixel-keyed protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PixelKey {
    pub row: usize,
    pub col: usize,
}

/// Grouping key of the ordered protocol. Field order defines the total
/// lexicographic order `(row, col, component)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContributionKey {
    pub row: usize,
    pub col: usize,
    pub component: Component,
}

impl ContributionKey {
    pub fn new(row: usize, col: usize, component: Component) -> Self {
        Self {
            row,
            col,
            component,
        }
    }

    #[inline]
    pub fn pixel(&self) -> PixelKey {
        PixelKey {
            row: self.row,
            col: self.col,
        }
    }
}

impl fmt::Display for ContributionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.row, self.col, self.component.tag())
    }
}

/// One source pixel's weighted addend to one target's component sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub key: ContributionKey,
    pub value: i64,
}

/// Final value of one output pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPixel {
    pub row: usize,
    pub col: usize,
    pub value: i32,
}
