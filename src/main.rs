use clap::Parser;
use env_logger::Builder;
use log::{debug, LevelFilter};

use policygen::cli::{self, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let (policygen_level, other_level) = match args.verbose {
        0 => (LevelFilter::Info, LevelFilter::Warn),
        1 => (LevelFilter::Debug, LevelFilter::Warn),
        2 => (LevelFilter::Trace, LevelFilter::Warn),
        _ => (LevelFilter::Trace, LevelFilter::Trace),
    };
    Builder::new()
        .filter(Some("policygen"), policygen_level)
        .filter(None, other_level)
        .init();
    debug!("Logging at levels {}/{}", policygen_level, other_level);

    if !cli::run(&args).await {
        std::process::exit(1);
    }
}
