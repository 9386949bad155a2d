use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::{Path, PathBuf};

use sensortrace::analysis;

/// Delivery statistics for wireless sensor network testbed traces
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the testbed trace log file
    log_file: PathBuf,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if !args.log_file.is_file() {
        eprintln!("Error: No such file.");
        std::process::exit(1);
    }

    info!("Parsing trace file: {:?}", args.log_file);
    let stats = analysis::process_trace(&args.log_file, Path::new("."))?;

    let report = analysis::build_report(&stats);
    print!("{}", analysis::render_text(&report));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["sensortrace", "test.log"]);

        assert_eq!(args.log_file, PathBuf::from("test.log"));
    }
}
