//! Crossgen symbol map discovery and parsing
//!
//! Crossgen writes a perf-style map next to the native image, named after the
//! image without its extension (`app.ni.exe` -> `/tmp/app.ni.<pid>.map` or
//! similar). Each record is `<hex address> <size> <method name ...>`, with the
//! address relative to the image base.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{OffsetError, SymbolEntry};

/// Suffix every symbol map file name ends with
const MAP_SUFFIX: &str = "map";

/// Image name with its final extension removed (`app.ni.exe` -> `app.ni`)
#[must_use]
pub fn image_stem(image: &str) -> &str {
    match image.rfind('.') {
        // A leading dot names a hidden file, not an extension
        Some(idx) if idx > 0 => &image[..idx],
        _ => image,
    }
}

/// Find the single symbol map for `image` in `dir`
///
/// Matches file names against `<stem>*map`.
///
/// # Errors
/// Returns `SymbolMapNotFound` when nothing matches, `AmbiguousSymbolMap`
/// when more than one file matches, or `SymbolMapUnreadable` if `dir`
/// cannot be listed.
pub fn locate_symbol_map(dir: &Path, image: &str) -> Result<PathBuf, OffsetError> {
    let stem = image_stem(image);
    let pattern = format!("{}/{stem}*{MAP_SUFFIX}", dir.display());

    let entries = fs::read_dir(dir).map_err(|source| OffsetError::SymbolMapUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_str()?;
            is_symbol_map_name(name, stem).then(|| entry.path())
        })
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(OffsetError::SymbolMapNotFound { pattern }),
        1 => {
            let path = matches.remove(0);
            info!("Using symbol map {}", path.display());
            Ok(path)
        }
        _ => Err(OffsetError::AmbiguousSymbolMap { pattern, matches }),
    }
}

/// Glob `<stem>*map` against a single file name
///
/// Only the `*` between stem and suffix is a wildcard. Glob metacharacters
/// inside the stem itself (`*`, `?`, `[`) match literally.
fn is_symbol_map_name(name: &str, stem: &str) -> bool {
    name.len() >= stem.len() + MAP_SUFFIX.len()
        && name.starts_with(stem)
        && name.ends_with(MAP_SUFFIX)
}

/// Read and parse every record of a symbol map
///
/// # Errors
/// Returns `SymbolMapUnreadable` if the file cannot be read, or
/// `MalformedSymbolRecord` for a record whose address is not hex.
pub fn read_symbol_map(path: &Path) -> Result<Vec<SymbolEntry>, OffsetError> {
    let bytes = fs::read(path).map_err(|source| OffsetError::SymbolMapUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_symbol_map(&String::from_utf8_lossy(&bytes))?;
    debug!("Read {} symbols from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse symbol map text, skipping blank lines
///
/// # Errors
/// Returns `MalformedSymbolRecord` for the first record whose address is not hex.
pub fn parse_symbol_map(text: &str) -> Result<Vec<SymbolEntry>, OffsetError> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_symbol_line(line, idx + 1).transpose())
        .collect()
}

/// Parse one record: field 0 is the hex address, field 1 is ignored and the
/// remaining fields, joined by single spaces, form the method name.
///
/// # Errors
/// Returns `MalformedSymbolRecord` if field 0 is not a hex number.
pub fn parse_symbol_line(line: &str, line_number: usize) -> Result<Option<SymbolEntry>, OffsetError> {
    let mut fields = line.split_whitespace();
    let Some(address) = fields.next() else {
        return Ok(None);
    };

    let address = u64::from_str_radix(address, 16).map_err(|_| {
        OffsetError::MalformedSymbolRecord { line_number, line: line.to_string() }
    })?;

    let name = fields.skip(1).collect::<Vec<_>>().join(" ");
    Ok(Some(SymbolEntry { address, name }))
}
