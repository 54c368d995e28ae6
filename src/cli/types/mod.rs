//! Type-safe enums shared by the CLI and the engine.

pub mod role;

pub use role::Role;
