//! Typed in-memory tabular data

pub mod dataset;
pub mod loader;

pub use dataset::{Column, Dataset};
pub use loader::DataLoader;
