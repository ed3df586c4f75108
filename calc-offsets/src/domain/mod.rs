//! Domain model for calc-offsets
//!
//! Core records passed between the pipeline stages, and the error type they
//! share.

pub mod errors;
pub mod types;

pub use types::{MappedRegion, Permissions, Pid, SymbolEntry, SymbolOffset};

pub use errors::OffsetError;
