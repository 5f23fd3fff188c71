use super::{Dims, PixelRecord, Tokens};
use crate::error::{Result, SobelError};

/// A byte range of the matrix body holding whole pixel tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSplit {
    /// Byte offset of the first token of the split.
    pub start: usize,
    /// Byte offset one past the split (start of the next split or end of text).
    pub end: usize,
    /// Row-major index of the first pixel in the split.
    pub first_pixel: usize,
    /// Number of pixels the split holds.
    pub pixel_count: usize,
}

/// Lazy reader over one [`InputSplit`].
///
/// Yields exactly `pixel_count` records unless the text is malformed, in which
/// case it yields one error and stops.
#[derive(Debug)]
pub struct SplitReader<'a> {
    tokens: Tokens<'a>,
    cols: usize,
    first_pixel: usize,
    total: usize,
    consumed: usize,
    failed: bool,
}

impl<'a> SplitReader<'a> {
    pub(crate) fn new(text: &'a str, split: &InputSplit, dims: Dims) -> Self {
        Self {
            tokens: Tokens::new(&text[..split.end], split.start),
            cols: dims.cols,
            first_pixel: split.first_pixel,
            total: split.pixel_count,
            consumed: 0,
            failed: false,
        }
    }

    /// Fraction of this split's pixels consumed so far, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.consumed as f32 / self.total as f32
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<'a> Iterator for SplitReader<'a> {
    type Item = Result<PixelRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.consumed >= self.total {
            return None;
        }
        let index = self.first_pixel + self.consumed;
        let (row, col) = (index / self.cols, index % self.cols);
        let Some((_, raw)) = self.tokens.next() else {
            self.failed = true;
            return Some(Err(SobelError::malformed(format!(
                "body ended before pixel ({row}, {col})"
            ))));
        };
        let value = match raw.parse::<i32>() {
            Ok(v) if (0..=255).contains(&v) => v,
            Ok(v) => {
                self.failed = true;
                return Some(Err(SobelError::malformed(format!(
                    "pixel ({row}, {col}) value {v} outside [0, 255]"
                ))));
            }
            Err(_) => {
                self.failed = true;
                return Some(Err(SobelError::malformed(format!(
                    "pixel ({row}, {col}) is not an integer: {raw:?}"
                ))));
            }
        };
        self.consumed += 1;
        Some(Ok(PixelRecord { row, col, value }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.consumed;
        (0, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use crate::source::PixelSource;

    #[test]
    fn progress_is_monotonic_and_completes() {
        let text = "2 3\n1 2 3\n4 5 6\n";
        let source = PixelSource::new(text).unwrap();
        let split = source.splits(1).unwrap()[0];
        let mut reader = source.reader(&split);
        let mut last = reader.progress();
        assert_eq!(last, 0.0);
        while let Some(record) = reader.next() {
            record.unwrap();
            let p = reader.progress();
            assert!(p > last, "progress went from {last} to {p}");
            last = p;
        }
        assert_eq!(reader.progress(), 1.0);
        assert_eq!(reader.consumed(), 6);
    }

    #[test]
    fn out_of_range_value_stops_reader() {
        let text = "1 3\n1 256 3\n";
        let source = PixelSource::new(text).unwrap();
        let split = source.splits(1).unwrap()[0];
        let results: Vec<_> = source.reader(&split).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn non_integer_token_is_reported_with_position() {
        let text = "2 2\n1 2\n3 x\n";
        let err = PixelSource::new(text).unwrap().read_all().unwrap_err();
        assert!(err.to_string().contains("(1, 1)"), "{err}");
    }
}
