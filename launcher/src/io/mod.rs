//! I/O helpers for the launcher pipeline.

pub mod config;
pub mod header;
pub mod platform;
pub mod resolver;
pub mod supervisor;
