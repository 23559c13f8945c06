// src/config.rs
//! Checker configuration: which safeguards are enabled and their parameters.
//!
//! Every flag defaults to "rule disabled" so a host that deserializes an
//! empty TOML table gets a checker that only runs the always-on quality
//! rules (primary keys, duplicates, naming, optimizations).

use crate::error::{CheckerError, Result};
use serde::{Deserialize, Serialize};

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Flag raster layers backed by an ECW file.
    #[serde(default)]
    pub prevent_ecw: bool,
    /// Flag PostgreSQL layers that rely on the host authentication database.
    #[serde(default)]
    pub prevent_auth_config: bool,
    /// Flag PostgreSQL layers that resolve their connection via a service file.
    #[serde(default)]
    pub prevent_service: bool,
    /// Require user and password to be stored in the datasource itself.
    #[serde(default)]
    pub force_pg_user_pass: bool,
    /// Flag file-based layers living on a drive unrelated to the project root.
    #[serde(default)]
    pub prevent_other_drive: bool,
    /// Allow file-based layers in a parent folder named `parent_folder`.
    #[serde(default)]
    pub allow_parent_folder: bool,
    /// Folder-name token checked when `allow_parent_folder` is set.
    #[serde(default)]
    pub parent_folder: String,
    /// Managed cloud hosting: implies the drive safeguard and the
    /// credentials check for hosts on `cloud_domain`.
    #[serde(default)]
    pub cloud_hosting: bool,
    /// Domain suffix identifying managed database hosts.
    #[serde(default = "default_cloud_domain")]
    pub cloud_domain: String,
    /// Pixel count above which a raster without pyramids is flagged.
    #[serde(default = "default_raster_cell_threshold")]
    pub raster_cell_threshold: u64,
}

impl CheckerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prevent_ecw: false,
            prevent_auth_config: false,
            prevent_service: false,
            force_pg_user_pass: false,
            prevent_other_drive: false,
            allow_parent_folder: false,
            parent_folder: String::new(),
            cloud_hosting: false,
            cloud_domain: default_cloud_domain(),
            raster_cell_threshold: default_raster_cell_threshold(),
        }
    }

    /// Parses a configuration from its TOML representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or fails [`Self::validate`].
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `allow_parent_folder` is set without a
    /// `parent_folder` token, which would turn the parent-folder safeguard
    /// into a match-everything rule.
    pub fn validate(&self) -> Result<()> {
        if self.allow_parent_folder && self.parent_folder.trim().is_empty() {
            return Err(CheckerError::Config(
                "allow_parent_folder requires a non-empty parent_folder token".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_cloud_domain() -> String {
    "lizmap.com".to_string()
}

const fn default_raster_cell_threshold() -> u64 {
    50_000_000
}
