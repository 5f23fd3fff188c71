use sobel_mapreduce::image::io::{load_grayscale_image, read_matrix, save_grayscale_png, write_matrix};
use sobel_mapreduce::Result;
use std::env;
use std::path::Path;

#[derive(Clone, Copy, Debug)]
enum Direction {
    ToMatrix,
    ToPng,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let direction = match args.first().map(String::as_str) {
        Some("to-matrix") => Direction::ToMatrix,
        Some("to-png") => Direction::ToPng,
        _ => {
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };
    if args.len() != 3 {
        eprintln!("{}", usage());
        std::process::exit(2);
    }
    if let Err(err) = run(direction, Path::new(&args[1]), Path::new(&args[2])) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(direction: Direction, input: &Path, output: &Path) -> Result<()> {
    let image = match direction {
        Direction::ToMatrix => {
            let image = load_grayscale_image(input)?;
            write_matrix(&image, output)?;
            image
        }
        Direction::ToPng => {
            let image = read_matrix(input)?;
            save_grayscale_png(&image, output)?;
            image
        }
    };
    println!(
        "Converted {}x{} image {} -> {}",
        image.h,
        image.w,
        input.display(),
        output.display()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: sobel-convert <to-matrix|to-png> <input> <output>".to_string()
}
