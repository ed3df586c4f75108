//! Structured error types for calc-offsets
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Pid;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OffsetError {
    #[error("Process {0} not found")]
    ProcessNotFound(Pid),

    #[error("Failed to read memory maps from {}", path.display())]
    MemoryMapsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No symbol map matches {pattern}")]
    SymbolMapNotFound { pattern: String },

    #[error("Multiple symbol maps match {pattern}: {}", matches.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    AmbiguousSymbolMap { pattern: String, matches: Vec<PathBuf> },

    #[error("Failed to read symbol map {}", path.display())]
    SymbolMapUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed symbol map record on line {line_number}: {line:?}")]
    MalformedSymbolRecord { line_number: usize, line: String },

    #[error("Image {image} is not mapped in the target process (mapped files: {})", mapped.join(", "))]
    ImageNotMapped { image: String, mapped: Vec<String> },

    #[error("No r-xp region of {image} contains address 0x{address:x} ({symbol})")]
    NoExecutableRegion { image: String, address: u64, symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OffsetError {
    /// True when the failure came from the OS refusing access
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::MemoryMapsUnreadable { source, .. } | Self::SymbolMapUnreadable { source, .. } => {
                source.kind() == std::io::ErrorKind::PermissionDenied
            }
            Self::Io(err) => err.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_not_found_display() {
        let err = OffsetError::ProcessNotFound(Pid(1234));
        assert_eq!(err.to_string(), "Process PID:1234 not found");
    }

    #[test]
    fn test_no_executable_region_display() {
        let err = OffsetError::NoExecutableRegion {
            image: "app.ni.exe".to_string(),
            address: 0x1500,
            symbol: "MethodA.Foo()".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("app.ni.exe"));
        assert!(msg.contains("0x1500"));
        assert!(msg.contains("MethodA.Foo()"));
    }

    #[test]
    fn test_image_not_mapped_lists_mapped_files() {
        let err = OffsetError::ImageNotMapped {
            image: "app.ni.exe".to_string(),
            mapped: vec!["libc.so.6".to_string(), "other.ni.exe".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Image app.ni.exe is not mapped in the target process \
             (mapped files: libc.so.6, other.ni.exe)"
        );
    }

    #[test]
    fn test_ambiguous_symbol_map_lists_matches() {
        let err = OffsetError::AmbiguousSymbolMap {
            pattern: "/tmp/app.ni*map".to_string(),
            matches: vec![PathBuf::from("/tmp/app.ni.map"), PathBuf::from("/tmp/app.ni.old.map")],
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/app.ni.map"));
        assert!(msg.contains("/tmp/app.ni.old.map"));
    }

    #[test]
    fn test_permission_denied_detection() {
        let err = OffsetError::MemoryMapsUnreadable {
            path: PathBuf::from("/proc/1/maps"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_permission_denied());
        let miss = OffsetError::ImageNotMapped { image: "x".to_string(), mapped: Vec::new() };
        assert!(!miss.is_permission_denied());
    }
}
