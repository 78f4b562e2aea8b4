//! Command-line front end for `formula-core`.

pub mod cli;
pub mod logging;

pub use cli::{Cli, Command, run};
