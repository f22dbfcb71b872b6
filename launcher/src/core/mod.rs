//! Deterministic, pure logic shared by the launcher pipeline.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data (header bytes, decoded lines, registry entries) and return
//! deterministic outputs suitable for tests.

pub mod bom;
pub mod compose;
pub mod directive;
pub mod line;
pub mod types;
pub mod version;
