//! Alfiere UCI chess engine main entry point.

use alfiere::uci::{run_uci_loop, UciEngine, UciOptions};
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log verbosity on stderr (off, error, warn, info, debug, trace)
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    /// Milliseconds held back from every time allocation
    #[arg(long, default_value_t = alfiere::time::DEFAULT_MOVE_OVERHEAD)]
    move_overhead: u64,
}

fn main() {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr; RUST_LOG overrides the flag
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    alfiere::init();

    let options = UciOptions {
        move_overhead: args.move_overhead.min(5000),
        ..UciOptions::default()
    };
    let mut engine = UciEngine::new().with_options(options);

    if let Err(e) = run_uci_loop(&mut engine) {
        log::error!("UCI loop failed: {}", e);
        std::process::exit(1);
    }
}
