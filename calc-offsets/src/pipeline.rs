//! End-to-end offset calculation
//!
//! Maps table -> symbol map -> translator -> writer. The pipeline only talks
//! to the filesystem for its two inputs and writes results to any
//! `io::Write`, so tests can drive it without a live process.

use log::{info, warn};
use std::io::Write;

use crate::cli::{Config, FailurePolicy, OutputFormat};
use crate::domain::{OffsetError, SymbolEntry, SymbolOffset};
use crate::memory_maps::{read_region_group, read_region_group_from, RegionGroup};
use crate::symbol_map::{locate_symbol_map, read_symbol_map};
use crate::translator::OffsetTranslator;

/// Counters reported after a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub translated: usize,
    pub skipped: usize,
}

/// Run the whole pipeline for `config`, writing one line per symbol to `out`
///
/// # Errors
/// Propagates every input, lookup and translation failure. With
/// `FailurePolicy::KeepGoing`, symbols without an executable region are
/// skipped instead.
pub fn run_pipeline<W: Write>(config: &Config, out: &mut W) -> Result<RunSummary, OffsetError> {
    let group = match &config.maps_file {
        Some(path) => read_region_group_from(path)?,
        None => read_region_group(config.pid)?,
    };

    let map_path = locate_symbol_map(&config.map_dir, &config.native_image)?;
    let entries = read_symbol_map(&map_path)?;

    translate_and_write(&group, config, entries, out)
}

/// Translate `entries` against the image named in `config` and write them out
///
/// # Errors
/// Returns `ImageNotMapped` on a lookup miss, `NoExecutableRegion` under
/// `FailurePolicy::FailFast`, or `Io` if writing fails.
pub fn translate_and_write<W: Write>(
    group: &RegionGroup,
    config: &Config,
    entries: Vec<SymbolEntry>,
    out: &mut W,
) -> Result<RunSummary, OffsetError> {
    let translator = OffsetTranslator::for_image(group, &config.native_image)?;
    let mut summary = RunSummary::default();

    for result in translator.translate_all(entries) {
        match result {
            Ok(offset) => {
                write_offset(out, &offset, config.output_format)?;
                summary.translated += 1;
            }
            Err(err @ OffsetError::NoExecutableRegion { .. })
                if config.failure_policy == FailurePolicy::KeepGoing =>
            {
                warn!("Skipping symbol: {err}");
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    out.flush()?;
    info!("Translated {} symbols, skipped {}", summary.translated, summary.skipped);
    Ok(summary)
}

fn write_offset<W: Write>(
    out: &mut W,
    offset: &SymbolOffset,
    format: OutputFormat,
) -> Result<(), OffsetError> {
    match format {
        OutputFormat::Text => writeln!(out, "{offset}")?,
        OutputFormat::JsonLines => {
            serde_json::to_writer(&mut *out, offset).map_err(std::io::Error::from)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
