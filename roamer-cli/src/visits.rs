//! `accept` and `block` commands: writes to the user state database.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roamer_core::{PlaceId, UserState, UserStateStore};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ARTEFACTS_DIR, ARG_CATALOG_DB, ARG_PLACE, ARG_USER, ARG_USER_DB, CliError,
    DEFAULT_USER, ENV_ACCEPT_PLACE, ENV_BLOCK_PLACE,
    artefacts::{ArtefactPaths, SqliteStoreBuilder, StoreBuilder, require_existing},
    pick::write_json,
};

/// CLI arguments for the `accept` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "accept",
    long_about = "Record that the user went to a place. The place is looked up \
                 in the catalogue so its categories feed the variety penalty; \
                 accepted places are never offered again.",
    about = "Record an accepted place"
)]
#[ortho_config(prefix = "ROAMER")]
pub(crate) struct AcceptArgs {
    /// Identifier of the accepted place.
    #[arg(long = ARG_PLACE, value_name = "id")]
    #[serde(default)]
    pub(crate) place: Option<String>,
    /// Directory containing the default artefact filenames.
    #[arg(long = ARG_ARTEFACTS_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) artefacts_dir: Option<Utf8PathBuf>,
    /// Override the path to the place catalogue (`places.db`).
    #[arg(long = ARG_CATALOG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog_db: Option<Utf8PathBuf>,
    /// Override the path to the user state database (`users.db`).
    #[arg(long = ARG_USER_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) user_db: Option<Utf8PathBuf>,
    /// User whose history is updated.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
}

/// CLI arguments for the `block` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "block",
    about = "Never offer a place to this user again"
)]
#[ortho_config(prefix = "ROAMER")]
pub(crate) struct BlockArgs {
    /// Identifier of the place to block.
    #[arg(long = ARG_PLACE, value_name = "id")]
    #[serde(default)]
    pub(crate) place: Option<String>,
    /// Directory containing the default artefact filenames.
    #[arg(long = ARG_ARTEFACTS_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) artefacts_dir: Option<Utf8PathBuf>,
    /// Override the path to the user state database (`users.db`).
    #[arg(long = ARG_USER_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) user_db: Option<Utf8PathBuf>,
    /// User whose no-go list is updated.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
}

/// Resolved configuration shared by `accept` and `block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VisitConfig {
    pub(crate) place: PlaceId,
    pub(crate) paths: ArtefactPaths,
    pub(crate) user: String,
}

impl TryFrom<AcceptArgs> for VisitConfig {
    type Error = CliError;

    fn try_from(args: AcceptArgs) -> Result<Self, Self::Error> {
        let place = args.place.ok_or(CliError::MissingArgument {
            field: ARG_PLACE,
            env: ENV_ACCEPT_PLACE,
        })?;
        Ok(Self {
            place: PlaceId::from(place),
            paths: ArtefactPaths::resolve(args.artefacts_dir, args.catalog_db, args.user_db),
            user: args.user.unwrap_or_else(|| DEFAULT_USER.to_owned()),
        })
    }
}

impl TryFrom<BlockArgs> for VisitConfig {
    type Error = CliError;

    fn try_from(args: BlockArgs) -> Result<Self, Self::Error> {
        let place = args.place.ok_or(CliError::MissingArgument {
            field: ARG_PLACE,
            env: ENV_BLOCK_PLACE,
        })?;
        Ok(Self {
            place: PlaceId::from(place),
            paths: ArtefactPaths::resolve(args.artefacts_dir, None, args.user_db),
            user: args.user.unwrap_or_else(|| DEFAULT_USER.to_owned()),
        })
    }
}

/// User state as printed after an update, with ids in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StateReport {
    pub(crate) user: String,
    pub(crate) visited: Vec<PlaceId>,
    pub(crate) no_go: Vec<PlaceId>,
    pub(crate) recent_categories: Vec<String>,
}

impl StateReport {
    fn new(user: &str, state: UserState) -> Self {
        let mut visited: Vec<_> = state.visited.into_iter().collect();
        visited.sort();
        let mut no_go: Vec<_> = state.no_go.into_iter().collect();
        no_go.sort();
        Self {
            user: user.to_owned(),
            visited,
            no_go,
            recent_categories: state
                .recent_categories
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

pub(crate) fn run_accept(args: AcceptArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_accept_with(args, &SqliteStoreBuilder, &mut stdout)
}

pub(crate) fn run_accept_with(
    args: AcceptArgs,
    stores: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = VisitConfig::try_from(merged)?;
    require_existing(&config.paths.catalog_db, ARG_CATALOG_DB)?;

    let catalog = stores.catalog(&config.paths.catalog_db)?;
    let place = catalog
        .place(&config.place)
        .ok_or_else(|| CliError::UnknownPlace {
            id: config.place.clone(),
        })?;
    let users = stores.user_state(&config.paths.user_db)?;
    users.record_visit(&config.user, &place)?;
    log::debug!("recorded visit to {} for {}", place.id, config.user);
    report(users.as_ref(), &config.user, writer)
}

pub(crate) fn run_block(args: BlockArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_block_with(args, &SqliteStoreBuilder, &mut stdout)
}

pub(crate) fn run_block_with(
    args: BlockArgs,
    stores: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = VisitConfig::try_from(merged)?;
    let users = stores.user_state(&config.paths.user_db)?;
    users.add_no_go(&config.user, &config.place)?;
    report(users.as_ref(), &config.user, writer)
}

fn report(users: &dyn UserStateStore, user: &str, writer: &mut dyn Write) -> Result<(), CliError> {
    let state = users.user_state(user)?;
    write_json(writer, &StateReport::new(user, state))
}
