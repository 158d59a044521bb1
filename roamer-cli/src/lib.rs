//! Command-line interface for picking places with the Roamer engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod artefacts;
mod error;
mod pick;
mod visits;

pub use error::CliError;

use pick::{PickArgs, run_pick};
use visits::{AcceptArgs, BlockArgs, run_accept, run_block};

pub(crate) const ARG_PICK_REQUEST: &str = "request";
pub(crate) const ARG_ARTEFACTS_DIR: &str = "artefacts-dir";
pub(crate) const ARG_CATALOG_DB: &str = "catalog-db";
pub(crate) const ARG_USER_DB: &str = "user-db";
pub(crate) const ARG_USER: &str = "user";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_PLACE: &str = "place";
pub(crate) const ENV_PICK_REQUEST: &str = "ROAMER_CMDS_PICK_REQUEST_PATH";
pub(crate) const ENV_ACCEPT_PLACE: &str = "ROAMER_CMDS_ACCEPT_PLACE";
pub(crate) const ENV_BLOCK_PLACE: &str = "ROAMER_CMDS_BLOCK_PLACE";

/// User id applied when none is configured.
pub(crate) const DEFAULT_USER: &str = "default";
/// File name of the place catalogue inside the artefacts directory.
pub(crate) const DEFAULT_CATALOG_DB: &str = "places.db";
/// File name of the user state database inside the artefacts directory.
pub(crate) const DEFAULT_USER_DB: &str = "users.db";

/// Run the Roamer CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, an
/// artefact cannot be read, or the selection fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Pick(args) => run_pick(args),
        Command::Accept(args) => run_accept(args),
        Command::Block(args) => run_block(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roamer",
    about = "Pick a random nearby place, weighted by distance, rating and variety",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Pick one place for a JSON-encoded selection request.
    Pick(PickArgs),
    /// Record that the user accepted a place.
    Accept(AcceptArgs),
    /// Add a place to the user's no-go list.
    Block(BlockArgs),
}

#[cfg(test)]
mod tests;
