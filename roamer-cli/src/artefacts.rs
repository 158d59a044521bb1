//! Artefact locations and the collaborators opened from them.

use camino::{Utf8Path, Utf8PathBuf};
use roamer_core::{PlaceCatalog, UserStateStore};
use roamer_fs::PathKind;

use crate::{CliError, DEFAULT_CATALOG_DB, DEFAULT_USER_DB};

/// Database paths after applying the artefacts directory defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArtefactPaths {
    /// Path to the SQLite place catalogue.
    pub(crate) catalog_db: Utf8PathBuf,
    /// Path to the SQLite user state database.
    pub(crate) user_db: Utf8PathBuf,
}

impl ArtefactPaths {
    /// Fill missing paths with the default file names under `artefacts_dir`
    /// (the working directory when unset).
    pub(crate) fn resolve(
        artefacts_dir: Option<Utf8PathBuf>,
        catalog_db: Option<Utf8PathBuf>,
        user_db: Option<Utf8PathBuf>,
    ) -> Self {
        let base = artefacts_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        Self {
            catalog_db: catalog_db.unwrap_or_else(|| base.join(DEFAULT_CATALOG_DB)),
            user_db: user_db.unwrap_or_else(|| base.join(DEFAULT_USER_DB)),
        }
    }
}

/// Fail unless `path` is an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match roamer_fs::classify(path) {
        Ok(PathKind::File) => Ok(()),
        Ok(PathKind::Missing) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(PathKind::Other) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Builds the catalogue and user state store for a command invocation.
pub(crate) trait StoreBuilder {
    fn catalog(&self, path: &Utf8Path) -> Result<Box<dyn PlaceCatalog>, CliError>;
    fn user_state(&self, path: &Utf8Path) -> Result<Box<dyn UserStateStore>, CliError>;
}

/// Opens the SQLite artefacts on disk.
pub(crate) struct SqliteStoreBuilder;

#[cfg(feature = "store-sqlite")]
impl StoreBuilder for SqliteStoreBuilder {
    fn catalog(&self, path: &Utf8Path) -> Result<Box<dyn PlaceCatalog>, CliError> {
        let catalog = roamer_core::SqlitePlaceCatalog::open(path.as_std_path())?;
        Ok(Box::new(catalog))
    }

    fn user_state(&self, path: &Utf8Path) -> Result<Box<dyn UserStateStore>, CliError> {
        roamer_fs::create_parent_dirs(path).map_err(|source| CliError::CreateStateDir {
            path: path.to_path_buf(),
            source,
        })?;
        let store = roamer_core::SqliteUserStateStore::open(path.as_std_path())?;
        Ok(Box::new(store))
    }
}

#[cfg(not(feature = "store-sqlite"))]
impl StoreBuilder for SqliteStoreBuilder {
    fn catalog(&self, _path: &Utf8Path) -> Result<Box<dyn PlaceCatalog>, CliError> {
        Err(CliError::MissingFeature {
            feature: "store-sqlite",
            action: "opening the place catalogue",
        })
    }

    fn user_state(&self, _path: &Utf8Path) -> Result<Box<dyn UserStateStore>, CliError> {
        Err(CliError::MissingFeature {
            feature: "store-sqlite",
            action: "opening the user state database",
        })
    }
}
