//! Command-line interface for calc-offsets
//!
//! This module contains CLI argument parsing and the run configuration built
//! from it.

pub mod args;

pub use args::{Args, Config, FailurePolicy, OutputFormat};
