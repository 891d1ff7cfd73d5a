//! Core library for the `cursus` CLI: AI-assisted authoring of lesson
//! plans and capstone projects.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod document;
pub mod generate;
pub mod logging;
pub mod ports;
pub mod store;
pub mod suggest;
pub mod tape;
pub mod tree;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command
/// execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
