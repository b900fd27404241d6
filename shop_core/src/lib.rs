mod catalog;
mod shop;

pub use catalog::UnitCatalog;
pub use shop::{Shop, ShopOffer, DEFAULT_OFFER_SIZE};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading unit catalog configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Error in '{path}': {error}")]
    Units {
        error: unit_core::ConfigError,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}
