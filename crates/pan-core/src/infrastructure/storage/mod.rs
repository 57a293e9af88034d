//! Storage infrastructure: configuration file persistence.
//!
//! Extends [`ConfigurationStore`] with:
//!
//! - [`load_from`](ConfigurationStore::load_from) /
//!   [`save_to`](ConfigurationStore::save_to): fallible, for callers that want
//!   to handle errors themselves.
//! - [`read`](ConfigurationStore::read) / [`write`](ConfigurationStore::write):
//!   best-effort wrappers that log failures and never return them.  A corrupt
//!   or unwritable file must not take the application down.
//!
//! The document lives at `<config_home>/pan-transit.json` unless a path is
//! given explicitly.

pub mod json;
pub mod paths;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

use crate::application::store::ConfigurationStore;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid JSON.
    #[error("failed to parse config JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file holds valid JSON whose top level is not an object.
    #[error("config at {path} is not a JSON object")]
    NotAnObject { path: PathBuf },

    /// The document could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigurationStore {
    /// Loads option values from the JSON document at `path`, or from the
    /// default location when `path` is `None`.
    ///
    /// A missing file is not an error: there is simply nothing to load.  Any
    /// other failure is logged and the store is left exactly as it was.
    /// Individual bad option values are discarded as described for
    /// [`update`](ConfigurationStore::update).
    pub fn read(&mut self, path: Option<&Path>) {
        let path = path.map_or_else(|| self.identity().config_file(), Path::to_path_buf);
        if !path.is_file() {
            debug!(path = %path.display(), "no configuration file to read");
            return;
        }
        if let Err(e) = self.load_from(&path) {
            error!(path = %path.display(), error = ?e, "failed to read configuration: {e}");
        }
    }

    /// Loads and merges the JSON document at `path`.
    ///
    /// The whole file is parsed before anything is merged, so a parse failure
    /// never applies part of a document.
    ///
    /// Returns the dotted paths of discarded option-value pairs.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`], [`StoreError::Parse`] or [`StoreError::NotAnObject`].
    pub fn load_from(&mut self, path: &Path) -> Result<Vec<String>, StoreError> {
        let document = json::read_document(path)?;
        if document.is_empty() {
            return Ok(Vec::new());
        }
        let discarded = self.update(&document);
        debug!(
            path = %path.display(),
            options = document.len(),
            discarded = discarded.len(),
            "configuration loaded"
        );
        Ok(discarded)
    }

    /// Writes option values as JSON to `path`, or to the default location
    /// when `path` is `None`.
    ///
    /// Unknown top-level options are left out and a `version` field is
    /// stamped in; see [`to_persisted`](ConfigurationStore::to_persisted).
    /// Failures are logged and swallowed.
    pub fn write(&self, path: Option<&Path>) {
        let path = path.map_or_else(|| self.identity().config_file(), Path::to_path_buf);
        if let Err(e) = self.save_to(&path) {
            error!(path = %path.display(), error = ?e, "failed to write configuration: {e}");
        }
    }

    /// Writes the persisted form of the store to `path`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] or [`StoreError::Serialize`].
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        json::write_document(path, &self.to_persisted())?;
        debug!(path = %path.display(), "configuration written");
        Ok(())
    }
}
