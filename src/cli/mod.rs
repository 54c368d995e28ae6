//! Command-line interface: argument parsing and CLI-facing value types.

pub mod args;
pub mod types;

pub use args::*;
