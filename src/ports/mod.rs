//! Port traits for the boundaries the checker touches.
//!
//! Baselines, stamps and version scripts go through [`FileSystem`]; report
//! timestamps come from [`Clock`]. Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;

pub use clock::Clock;
pub use filesystem::FileSystem;
