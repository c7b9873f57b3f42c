//! Subcommand implementations.

pub mod delete;
pub mod formats;
pub mod harvest;
pub mod page;
pub mod put;
