//! # calc-offsets - File Offsets for Crossgen Native Images
//!
//! Dynamic tracing tools such as perf and bcc place uprobes at a *file
//! offset* inside an ELF/PE image. Crossgen, the .NET ahead-of-time compiler,
//! emits a symbol map alongside each native image, but the addresses in it
//! are virtual addresses relative to where the loader placed the image. This
//! crate turns those addresses into file offsets using the live process's
//! memory mappings.
//!
//! ## Pipeline
//!
//! ```text
//! /proc/<pid>/maps ──▶ memory_maps ──▶ RegionGroup ─┐
//!                                                   ├──▶ translator ──▶ offset: <hex> : <symbol>
//! /tmp/<stem>*map  ──▶ symbol_map  ──▶ SymbolEntry ─┘
//! ```
//!
//! ## Module Structure
//!
//! - [`memory_maps`]: parse the mapping table and group file-backed regions
//!   by backing file name
//! - [`symbol_map`]: locate and parse the crossgen symbol map
//! - [`translator`]: find the executable region for each address and compute
//!   the file offset
//! - [`pipeline`]: wire the stages together and write results
//! - [`cli`]: command-line arguments and the run configuration
//! - [`domain`]: shared records and the error type
//!
//! ## Typical Usage
//!
//! ```bash
//! calc-offsets 1234 sample-netcore-app.ni.exe
//! # offset: 1a2b0 : SampleApp.Program.Main(string[])
//! ```

pub mod cli;
pub mod domain;
pub mod memory_maps;
pub mod pipeline;
pub mod symbol_map;
pub mod translator;
