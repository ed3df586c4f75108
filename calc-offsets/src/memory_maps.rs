//! Memory mapping utilities for process address space analysis
//!
//! This module parses `/proc/<pid>/maps` into file-backed regions grouped by
//! the base name of their backing file. The translator needs every region of
//! the native image, in mapping-table order, to find the image base and the
//! executable segment.

use log::{info, trace};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{MappedRegion, OffsetError, Permissions, Pid};

/// File-backed regions keyed by the base name of the backing file
///
/// Regions for one file keep the order they had in the mapping table, which
/// is ascending by virtual address since the loader maps segments in order.
#[derive(Debug, Clone, Default)]
pub struct RegionGroup {
    regions: HashMap<String, Vec<MappedRegion>>,
}

impl RegionGroup {
    /// Regions backed by the file with this base name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[MappedRegion]> {
        self.regions.get(name).map(Vec::as_slice)
    }

    /// Base names of all mapped files, sorted
    #[must_use]
    pub fn image_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of distinct backing files
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn push(&mut self, name: String, region: MappedRegion) {
        self.regions.entry(name).or_default().push(region);
    }
}

/// Read and group the mapping table of a live process
///
/// # Errors
/// Returns `ProcessNotFound` if `/proc/<pid>` does not exist, or
/// `MemoryMapsUnreadable` if the maps file cannot be read (usually a
/// permission problem).
pub fn read_region_group(pid: Pid) -> Result<RegionGroup, OffsetError> {
    let proc_path = format!("/proc/{}", pid.0);
    if !Path::new(&proc_path).exists() {
        return Err(OffsetError::ProcessNotFound(pid));
    }

    read_region_group_from(Path::new(&format!("{proc_path}/maps")))
}

/// Read and group a mapping table from an arbitrary file
///
/// Used for saved copies of `/proc/<pid>/maps`.
///
/// # Errors
/// Returns `MemoryMapsUnreadable` if the file cannot be read.
pub fn read_region_group_from(path: &Path) -> Result<RegionGroup, OffsetError> {
    let maps = fs::read(path).map_err(|source| OffsetError::MemoryMapsUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    // Paths are raw bytes and need not be UTF-8
    let group = parse_region_group(&String::from_utf8_lossy(&maps));
    info!("Parsed {} mapped files from {}", group.len(), path.display());
    Ok(group)
}

/// Parse mapping-table text into a `RegionGroup`
///
/// Lines that do not have the `start-end perms offset dev inode path` shape
/// are skipped, as are anonymous and pseudo mappings (`[stack]`, `[heap]`)
/// whose path has no `/`.
#[must_use]
pub fn parse_region_group(maps: &str) -> RegionGroup {
    let mut group = RegionGroup::default();

    for line in maps.lines() {
        let Some(region) = parse_maps_line(line) else {
            trace!("Skipping maps line: {line:?}");
            continue;
        };

        let Some(name) = region.path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            trace!("Skipping maps line without file name: {line:?}");
            continue;
        };

        group.push(name, region);
    }

    group
}

/// Parse one maps line: "start-end perms offset dev inode pathname"
fn parse_maps_line(line: &str) -> Option<MappedRegion> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 6 {
        return None;
    }

    let path = parts[5];
    if !path.contains('/') {
        return None;
    }

    let (start, end) = parts[0].split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    let permissions = Permissions::parse(parts[1])?;
    let file_offset = u64::from_str_radix(parts[2], 16).ok()?;

    Some(MappedRegion { start, end, permissions, file_offset, path: PathBuf::from(path) })
}
