//! Host application identity.
//!
//! The store never computes where it lives or which version wrote it; the
//! hosting application supplies both through [`AppIdentity`] at construction.

use std::path::{Path, PathBuf};

/// File name of the persisted configuration inside the config home.
pub const CONFIG_FILE_NAME: &str = "pan-transit.json";

/// Application version and config-home directory, as known to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    config_home: PathBuf,
    version: String,
}

impl AppIdentity {
    pub fn new(config_home: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            config_home: config_home.into(),
            version: version.into(),
        }
    }

    /// Directory holding the application's configuration files.
    pub fn config_home(&self) -> &Path {
        &self.config_home
    }

    /// Version string stamped into every written document.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Default location of the persisted configuration document.
    pub fn config_file(&self) -> PathBuf {
        self.config_home.join(CONFIG_FILE_NAME)
    }
}
