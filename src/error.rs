// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("project base directory must be absolute (got: {})", path.display())]
    RelativeBaseDirectory { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CheckerError>;
