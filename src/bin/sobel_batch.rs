use sobel_mapreduce::batch::{filter_files, output_path_for, BatchItem};
use sobel_mapreduce::Result;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("{}", usage());
        std::process::exit(2);
    }
    if let Err(err) = run(Path::new(&args[0]), &args[1..]) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(out_dir: &Path, inputs: &[String]) -> Result<()> {
    let items: Vec<BatchItem> = inputs
        .iter()
        .map(|input| {
            let input = PathBuf::from(input);
            let output = output_path_for(&input, out_dir);
            BatchItem { input, output }
        })
        .collect();
    let done = filter_files(&items)?;
    println!("Filtered {done} images into {}", out_dir.display());
    Ok(())
}

fn usage() -> String {
    "Usage: sobel-batch <output-dir> <input>...".to_string()
}
