//! Shared building blocks for the focal week view crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
