//! Whole-image parallel variant: each image goes to one worker, which runs
//! the reference filter on it. No state is shared between images.
use crate::edges::sobel_magnitude;
use crate::error::Result;
use crate::image::io::{read_matrix, write_matrix};
use crate::image::ImageI32;
use log::debug;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Suffix appended to the input file stem by [`output_path_for`].
pub const FILTERED_SUFFIX: &str = "_filtered";

/// One input/output pair of a batch.
#[derive(Clone, Debug)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Filter images already in memory, one worker per image.
pub fn filter_images(images: &[ImageI32]) -> Vec<ImageI32> {
    images.par_iter().map(sobel_magnitude).collect()
}

/// Read, filter and write every item. Stops at the first failing item.
pub fn filter_files(items: &[BatchItem]) -> Result<usize> {
    items
        .par_iter()
        .map(|item| -> Result<()> {
            let image = read_matrix(&item.input)?;
            let filtered = sobel_magnitude(&image);
            write_matrix(&filtered, &item.output)?;
            debug!(
                "batch filtered {} -> {} ({}x{})",
                item.input.display(),
                item.output.display(),
                image.h,
                image.w
            );
            Ok(())
        })
        .collect::<Result<Vec<()>>>()
        .map(|done| done.len())
}

/// `dir/<stem>_filtered.txt` for `input`.
pub fn output_path_for(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{stem}{FILTERED_SUFFIX}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::io::format_matrix;
    use std::fs;

    #[test]
    fn output_names_follow_input_stem() {
        let path = output_path_for(Path::new("/data/Fox_g.txt"), Path::new("out"));
        assert_eq!(path, PathBuf::from("out/Fox_g_filtered.txt"));
    }

    #[test]
    fn files_are_filtered_independently() {
        let dir = tempfile::tempdir().unwrap();
        let flat = ImageI32::from_vec(3, 3, vec![9; 9]).unwrap();
        let mut spike = ImageI32::new(3, 3);
        spike.set(0, 1, 100);
        let mut items = Vec::new();
        for (name, image) in [("flat.txt", &flat), ("spike.txt", &spike)] {
            let input = dir.path().join(name);
            fs::write(&input, format_matrix(image)).unwrap();
            let output = output_path_for(&input, &dir.path().join("out"));
            items.push(BatchItem { input, output });
        }
        assert_eq!(filter_files(&items).unwrap(), 2);
        let spike_out = read_matrix(&items[1].output).unwrap();
        assert_eq!(spike_out, sobel_magnitude(&spike));
        assert_eq!(filter_images(&[flat.clone()])[0], ImageI32::new(3, 3));
    }
}
