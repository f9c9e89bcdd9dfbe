//! Shared permalink data models consumed by the core library and provider crates.

pub mod lines;
pub mod repository;

pub use lines::*;
pub use repository::*;
