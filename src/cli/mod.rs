//! Command-line interface

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{commit, parse_message, Runner, SingerMessage};
