use sobel_mapreduce::edges::sobel_magnitude;
use sobel_mapreduce::image::io::{read_matrix, write_matrix};
use sobel_mapreduce::Result;
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 2 {
        eprintln!("{}", usage());
        std::process::exit(2);
    }
    if let Err(err) = run(Path::new(&args[0]), Path::new(&args[1])) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(input: &Path, output: &Path) -> Result<()> {
    let start = Instant::now();
    let image = read_matrix(input)?;
    let filtered = sobel_magnitude(&image);
    write_matrix(&filtered, output)?;
    log::info!(
        "reference filter {}x{} in {:.1} ms",
        image.h,
        image.w,
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!("Saved filtered image to {}", output.display());
    Ok(())
}

fn usage() -> String {
    "Usage: sobel-reference <input> <output>".to_string()
}
