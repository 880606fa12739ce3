//! CLI command implementations.

pub mod ambient;
pub mod bell;
pub mod catalog;
pub mod common;
pub mod history;
pub mod render;
pub mod settings;
pub mod sit;
