//! Platform config-home resolution for the host application.
//!
//! - Linux:   `$XDG_CONFIG_HOME/<app>` or `~/.config/<app>`
//! - macOS:   `~/Library/Application Support/<app>`
//! - Windows: `%APPDATA%\<app>`

use std::path::PathBuf;

use super::StoreError;
use crate::domain::identity::AppIdentity;

/// Determines the platform-appropriate config directory for `app_name`.
///
/// # Errors
///
/// Returns [`StoreError::NoPlatformConfigDir`] when the platform base
/// directory cannot be determined from the environment.
pub fn platform_config_home(app_name: &str) -> Result<PathBuf, StoreError> {
    dirs::config_dir()
        .map(|base| base.join(app_name))
        .ok_or(StoreError::NoPlatformConfigDir)
}

/// Builds an [`AppIdentity`] rooted at the platform config directory.
///
/// # Errors
///
/// As for [`platform_config_home`].
pub fn platform_identity(app_name: &str, version: &str) -> Result<AppIdentity, StoreError> {
    Ok(AppIdentity::new(platform_config_home(app_name)?, version))
}
