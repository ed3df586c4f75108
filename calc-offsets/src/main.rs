//! # calc-offsets - Main Entry Point
//!
//! `calc-offsets <PID> <NATIVE_IMAGE>` prints the file offset of every method
//! in the image's crossgen symbol map.

use anyhow::{Context, Result};
use calc_offsets::cli::{Args, Config};
use calc_offsets::domain::OffsetError;
use calc_offsets::pipeline::run_pipeline;
use clap::Parser;
use log::info;
use std::io::{self, BufWriter};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<OffsetError>() {
        Some(e) if e.is_permission_denied() => EXIT_NOPERM,
        _ => EXIT_ERROR,
    }
}

fn run() -> Result<()> {
    // Usage errors exit here with clap's own status code
    let config = Config::from(Args::parse());
    info!("Calculating offsets for {} in {}", config.native_image, config.pid);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = run_pipeline(&config, &mut out)
        .with_context(|| format!("Failed to calculate offsets for {}", config.native_image))?;

    if summary.skipped > 0 {
        eprintln!("warning: skipped {} symbols outside executable regions", summary.skipped);
    }

    Ok(())
}
