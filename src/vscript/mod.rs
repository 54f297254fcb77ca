//! Linker version scripts: generation and legacy seed parsing.

pub mod generate;
pub mod legacy;

pub use generate::{VersionScriptGenerator, ALWAYS_LOCAL};
pub use legacy::seed_patterns;
