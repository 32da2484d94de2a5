//! Terminal presentation layer.

pub mod export;
pub mod summary;
pub mod ui;
