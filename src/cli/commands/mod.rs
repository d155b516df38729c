//! One module per CLI subcommand.

pub mod completions;
pub mod delete;
pub mod generate;
pub mod get;
pub mod list;
pub mod shell;
pub mod store;
