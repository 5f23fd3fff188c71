use sobel_mapreduce::config::{load_config, JobConfig};
use sobel_mapreduce::{Result, SobelJob};
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if !(2..=3).contains(&args.len()) {
        eprintln!("{}", usage());
        std::process::exit(2);
    }
    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = match args.get(2) {
        Some(path) => load_config(Path::new(path))?,
        None => JobConfig::default(),
    };
    let job = SobelJob::new(config)?;
    let report = job.run_file(Path::new(&args[0]), Path::new(&args[1]))?;

    println!(
        "Filtered {}x{} image: {} contributions, {} groups, {:.1} ms",
        report.rows, report.cols, report.contributions, report.groups, report.timing.total_ms
    );
    for stage in &report.timing.stages {
        println!("  {:<9} {:>9.3} ms", stage.label, stage.elapsed_ms);
    }
    Ok(())
}

fn usage() -> String {
    "Usage: sobel-mapreduce <input> <output> [config.json]".to_string()
}
