//! Offline commands that work on the database directly.

pub mod export;
pub mod stats;
