//! CLI subcommand implementations.

pub mod add;
pub mod export;
pub mod info;
pub mod list;
pub mod remove;
pub mod serve;
