//! Synthetic series generation for tests and demos.

pub mod synthetic;

pub use synthetic::*;
