//! The main entry point for the `toksync` command-line application.
//!
//! This file is responsible for parsing command-line arguments and handing
//! them to the sync pipeline in the `toksync` library. Per-file failures are
//! reported by the pipeline itself and never change the exit code.

use std::path::Path;
use toksync::cli;
use toksync::syncer;

fn main() {
    let args = cli::parse_args();

    syncer::run_sync(
        Path::new("."),
        Some(&args.config),
        args.unsync,
        &args.file,
        args.verbose,
        args.unwrite,
        &args.prefix,
    );
}
