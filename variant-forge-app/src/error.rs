use svc_core::{CollectionError, RegistryError};
use svc_rules::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Load Error: {0}")]
    Load(#[from] LoadError),

    #[error("Component Error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Collection Error: {0}")]
    Collection(#[from] CollectionError),
}
