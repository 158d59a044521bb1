//! Pick command implementation for the Roamer CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roamer_core::{Place, Selection, SelectionRequest, Selector};
use roamer_selector::WeightedSelector;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ARTEFACTS_DIR, ARG_CATALOG_DB, ARG_PICK_REQUEST, ARG_SEED, ARG_USER, ARG_USER_DB,
    CliError, DEFAULT_USER, ENV_PICK_REQUEST,
    artefacts::{ArtefactPaths, SqliteStoreBuilder, StoreBuilder, require_existing},
};

/// CLI arguments for the `pick` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "pick",
    long_about = "Pick a place for a JSON-encoded SelectionRequest. Candidates \
                 come from the SQLite place catalogue (places.db) and the \
                 user's visit history and no-go list from users.db. The \
                 selection is printed as JSON.",
    about = "Pick a random nearby place"
)]
#[ortho_config(prefix = "ROAMER")]
pub(crate) struct PickArgs {
    /// Path to a JSON file containing a SelectionRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
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
    /// User whose history and no-go list apply.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Seed for a reproducible pick.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl PickArgs {
    pub(crate) fn into_config(self) -> Result<PickConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PickConfig::try_from(merged)
    }
}

/// Resolved `pick` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PickConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Catalogue and user state locations.
    pub(crate) paths: ArtefactPaths,
    /// User whose state applies.
    pub(crate) user: String,
    /// Seed for the generator; fresh entropy when absent.
    pub(crate) seed: Option<u64>,
}

impl PickConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_PICK_REQUEST)?;
        require_existing(&self.paths.catalog_db, ARG_CATALOG_DB)?;
        Ok(())
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
            None => Box::new(rand::thread_rng()),
        }
    }
}

impl TryFrom<PickArgs> for PickConfig {
    type Error = CliError;

    fn try_from(args: PickArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PICK_REQUEST,
            env: ENV_PICK_REQUEST,
        })?;
        Ok(Self {
            request_path,
            paths: ArtefactPaths::resolve(args.artefacts_dir, args.catalog_db, args.user_db),
            user: args.user.unwrap_or_else(|| DEFAULT_USER.to_owned()),
            seed: args.seed,
        })
    }
}

pub(crate) fn run_pick(args: PickArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_pick_with(args, &SqliteStoreBuilder, &WeightedSelector::new(), &mut stdout)
}

pub(crate) fn run_pick_with(
    args: PickArgs,
    stores: &dyn StoreBuilder,
    selector: &dyn Selector,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let selection = execute_pick(&config, stores, selector)?;
    write_json(writer, &selection)
}

fn execute_pick(
    config: &PickConfig,
    stores: &dyn StoreBuilder,
    selector: &dyn Selector,
) -> Result<Selection, CliError> {
    let request = load_request(&config.request_path)?;
    request
        .validate()
        .map_err(|source| CliError::InvalidRequest {
            path: config.request_path.clone(),
            source,
        })?;

    let catalog = stores.catalog(&config.paths.catalog_db)?;
    let users = stores.user_state(&config.paths.user_db)?;
    let personalised = users.user_state(&config.user)?.apply_to(request);
    let candidates: Vec<Place> = catalog
        .places_within(personalised.origin, personalised.radius_metres)
        .collect();
    log::debug!(
        "catalogue returned {} candidates for {}",
        candidates.len(),
        config.user
    );

    let mut rng = config.rng();
    selector
        .select(&personalised, &candidates, rng.as_mut())
        .map_err(|source| CliError::Select { source })
}

/// Loads a JSON-encoded [`SelectionRequest`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<SelectionRequest, CliError> {
    let payload = roamer_fs::read_to_string(path).map_err(|source| CliError::ReadRequest {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&payload).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PickConfig, CliError> {
    let merged = PickArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PickConfig::try_from(merged)
}
