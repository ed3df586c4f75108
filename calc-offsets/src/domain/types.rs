//! Domain types for address translation
//!
//! Newtypes and records shared by the maps parser, the symbol map reader and
//! the translator.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Process ID
///
/// Represents the process whose mapping table is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID:{}", self.0)
    }
}

impl From<u32> for Pid {
    fn from(pid: u32) -> Self {
        Pid(pid)
    }
}

/// Permission flags of a mapped region (`r-xp`, `rw-s`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
    /// Private (copy-on-write) mapping; `false` means shared
    pub private: bool,
}

impl Permissions {
    /// Parse the four-character flag field from a maps line
    ///
    /// Returns `None` unless the field has exactly the `rwxp` shape.
    #[must_use]
    pub fn parse(field: &str) -> Option<Self> {
        let bytes = field.as_bytes();
        if bytes.len() != 4 {
            return None;
        }

        let flag = |byte: u8, set: u8| match byte {
            b if b == set => Some(true),
            b'-' => Some(false),
            _ => None,
        };

        let private = match bytes[3] {
            b'p' => true,
            b's' => false,
            _ => return None,
        };

        Some(Self {
            read: flag(bytes[0], b'r')?,
            write: flag(bytes[1], b'w')?,
            execute: flag(bytes[2], b'x')?,
            private,
        })
    }

    /// True only for `r-xp`: readable, executable, private and not writable
    #[must_use]
    pub fn is_private_code(self) -> bool {
        self.read && !self.write && self.execute && self.private
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.read { 'r' } else { '-' },
            if self.write { 'w' } else { '-' },
            if self.execute { 'x' } else { '-' },
            if self.private { 'p' } else { 's' },
        )
    }
}

/// One file-backed region of a process's address space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRegion {
    pub start: u64,
    pub end: u64,
    pub permissions: Permissions,
    /// Offset into the backing file where this region begins
    pub file_offset: u64,
    pub path: PathBuf,
}

/// One record of a crossgen symbol map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Virtual address relative to the image base
    pub address: u64,
    pub name: String,
}

/// A symbol translated to its position in the backing file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolOffset {
    #[serde(rename = "offset", serialize_with = "serialize_hex")]
    pub file_offset: u64,
    pub symbol: String,
}

impl fmt::Display for SymbolOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset: {:x} : {}", self.file_offset, self.symbol)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_hex<S: serde::Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_parse() {
        let perms = Permissions::parse("r-xp").unwrap();
        assert!(perms.read && perms.execute && perms.private);
        assert!(!perms.write);
        assert!(perms.is_private_code());
        assert_eq!(perms.to_string(), "r-xp");
    }

    #[test]
    fn test_permissions_only_r_xp_is_private_code() {
        for field in ["r--p", "rw-p", "rwxp", "r-xs", "--xp", "---p"] {
            let perms = Permissions::parse(field).unwrap();
            assert!(!perms.is_private_code(), "{field} must not count as private code");
        }
    }

    #[test]
    fn test_permissions_rejects_malformed() {
        assert!(Permissions::parse("r-x").is_none());
        assert!(Permissions::parse("r-xq").is_none());
        assert!(Permissions::parse("xr-p").is_none());
        assert!(Permissions::parse("").is_none());
    }

    #[test]
    fn test_symbol_offset_display() {
        let out = SymbolOffset { file_offset: 0x1500, symbol: "MethodA.Foo()".to_string() };
        assert_eq!(out.to_string(), "offset: 1500 : MethodA.Foo()");
    }

    #[test]
    fn test_symbol_offset_json() {
        let out = SymbolOffset { file_offset: 0xbeef, symbol: "A.B(int, string)".to_string() };
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"offset":"beef","symbol":"A.B(int, string)"}"#);
    }

    #[test]
    fn test_pid_display() {
        assert_eq!(Pid(1234).to_string(), "PID:1234");
    }
}
