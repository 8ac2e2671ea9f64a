//! CLI subcommands

pub mod catalog;
pub mod interpret;
pub mod run;
