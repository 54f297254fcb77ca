//! Live adapters backed by the real disk and system clock.

pub mod clock;
pub mod filesystem;
