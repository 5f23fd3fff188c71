//! Pixel source over the plain-text matrix format.
//!
//! The text starts with a `rows cols` header followed by `rows * cols`
//! integers in row-major order, separated by arbitrary ASCII whitespace.
//! [`PixelSource`] parses the header eagerly and exposes the body as a lazy,
//! splittable stream of [`PixelRecord`]s:
//!
//! - [`PixelSource::splits`] cuts the body into byte ranges aligned on token
//!   boundaries, each tagged with the index of its first pixel, so a worker can
//!   consume a split without seeing anything before it.
//! - [`SplitReader`] turns one split back into correctly positioned
//!   `(row, col, value)` triples and reports its progress.
//!
//! ```
//! use sobel_mapreduce::source::PixelSource;
//!
//! let text = "2 3\n1 2 3\n4 5 6\n";
//! let source = PixelSource::new(text).unwrap();
//! let splits = source.splits(2).unwrap();
//! assert_eq!(splits.len(), 2);
//! let second: Vec<_> = source.reader(&splits[1]).collect::<Result<_, _>>().unwrap();
//! assert_eq!((second[0].row, second[0].col, second[0].value), (1, 0, 4));
//! ```

pub mod split;

pub use split::{InputSplit, SplitReader};

use crate::error::{Result, SobelError};
use crate::image::ImageI32;
use log::debug;

/// One input pixel, positioned in the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRecord {
    pub row: usize,
    pub col: usize,
    pub value: i32,
}

/// Image dimensions shared by every stage of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub fn pixel_count(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    #[inline]
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 >= self.rows || col + 1 >= self.cols
    }
}

/// Header-parsed view over a serialized matrix.
#[derive(Clone, Debug)]
pub struct PixelSource<'a> {
    text: &'a str,
    dims: Dims,
    body_start: usize,
}

impl<'a> PixelSource<'a> {
    /// Parse the `rows cols` header.
    pub fn new(text: &'a str) -> Result<Self> {
        let mut tokens = Tokens::new(text, 0);
        let rows = parse_dim(tokens.next(), "rows")?;
        let cols = parse_dim(tokens.next(), "cols")?;
        rows.checked_mul(cols)
            .ok_or_else(|| SobelError::malformed(format!("{rows}x{cols} image is too large")))?;
        Ok(Self {
            text,
            dims: Dims { rows, cols },
            body_start: tokens.pos,
        })
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Cut the body into at most `count` splits of near-equal pixel counts.
    ///
    /// Boundaries are found with a single token scan that does not parse the
    /// values; the scan also checks that the body holds exactly
    /// `rows * cols` tokens.
    pub fn splits(&self, count: usize) -> Result<Vec<InputSplit>> {
        let total = self.dims.pixel_count();
        let count = count.clamp(1, total);
        let chunk = total.div_ceil(count);

        let mut starts = Vec::with_capacity(count);
        let mut seen = 0usize;
        for (offset, _) in Tokens::new(self.text, self.body_start) {
            if seen < total && seen % chunk == 0 {
                starts.push((offset, seen));
            }
            seen += 1;
        }
        if seen != total {
            return Err(SobelError::malformed(format!(
                "header announces {} pixels ({}x{}) but body holds {seen} values",
                total, self.dims.rows, self.dims.cols
            )));
        }

        let splits: Vec<InputSplit> = starts
            .iter()
            .enumerate()
            .map(|(i, &(start, first_pixel))| {
                let (end, next_pixel) = starts
                    .get(i + 1)
                    .copied()
                    .unwrap_or((self.text.len(), total));
                InputSplit {
                    start,
                    end,
                    first_pixel,
                    pixel_count: next_pixel - first_pixel,
                }
            })
            .collect();
        debug!(
            "PixelSource::splits {}x{} pixels={} requested={} produced={}",
            self.dims.rows,
            self.dims.cols,
            total,
            count,
            splits.len()
        );
        Ok(splits)
    }

    /// Lazily read the records of one split.
    pub fn reader(&self, split: &InputSplit) -> SplitReader<'a> {
        SplitReader::new(self.text, split, self.dims)
    }

    /// Parse the whole matrix into an owned image.
    ///
    /// The body is counted before anything is allocated, so a header that
    /// promises more pixels than the body holds is `MalformedInput`.
    pub fn read_all(&self) -> Result<ImageI32> {
        let splits = self.splits(1)?;
        let mut data = Vec::with_capacity(self.dims.pixel_count());
        for split in &splits {
            for record in self.reader(split) {
                data.push(record?.value);
            }
        }
        ImageI32::from_vec(self.dims.cols, self.dims.rows, data)
            .ok_or_else(|| SobelError::malformed("body does not fill the announced matrix"))
    }
}

fn parse_dim(token: Option<(usize, &str)>, what: &str) -> Result<usize> {
    let (_, raw) = token.ok_or_else(|| SobelError::malformed(format!("missing {what} in header")))?;
    let value: usize = raw
        .parse()
        .map_err(|_| SobelError::malformed(format!("invalid {what} in header: {raw:?}")))?;
    if value == 0 {
        return Err(SobelError::malformed(format!("{what} must be at least 1")));
    }
    Ok(value)
}

/// Whitespace tokenizer yielding `(byte offset, token)` pairs.
#[derive(Clone, Debug)]
pub(crate) struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < bytes.len() && !bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Some((start, &self.text[start..self.pos]))
    }
}
