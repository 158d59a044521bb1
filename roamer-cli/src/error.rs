//! Error types emitted by the Roamer CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
#[cfg(feature = "store-sqlite")]
use roamer_core::SqlitePlaceCatalogError;
use roamer_core::{PlaceId, SelectError, SelectionRequestValidationError, UserStateError};
use thiserror::Error;

/// Errors emitted by the Roamer CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature that would enable the operation.
        feature: &'static str,
        /// Operation that was attempted.
        action: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the selection request file failed.
    #[error("failed to read selection request at {path:?}: {source}")]
    ReadRequest {
        /// Request file location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Selection request JSON could not be decoded.
    #[error("failed to parse selection request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request file location.
        path: Utf8PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The selection request payload failed validation.
    #[error("selection request in {path:?} failed validation: {source}")]
    InvalidRequest {
        /// Request file location.
        path: Utf8PathBuf,
        /// First failing field.
        #[source]
        source: SelectionRequestValidationError,
    },
    /// Opening the place catalogue failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    OpenCatalog(#[from] SqlitePlaceCatalogError),
    /// Creating the directory for the user state database failed.
    #[error("failed to create directory for {path:?}: {source}")]
    CreateStateDir {
        /// Database location whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Reading or writing user state failed.
    #[error(transparent)]
    UserState(#[from] UserStateError),
    /// The place is not in the catalogue.
    #[error("place {id} is not in the catalogue")]
    UnknownPlace {
        /// Identifier that was looked up.
        id: PlaceId,
    },
    /// The selector could not pick a place.
    #[error("selection failed: {source}")]
    Select {
        /// Selector failure.
        #[source]
        source: SelectError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
