#![deny(clippy::all, clippy::pedantic)]

use dataengineer_hub::config::{self, LoadError, Settings};
use dataengineer_hub::infra::error::InfraError;
use dataengineer_hub::wordpress::{ApiClient, ApiError, CachePolicy};
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
    #[error("startup error: {0}")]
    Infra(#[from] InfraError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct Ctx {
    pub client: ApiClient,
    pub policy: CachePolicy,
}

impl Ctx {
    pub fn new(settings: &Settings, refresh: bool) -> Result<Self, CliError> {
        let client = ApiClient::from_settings(settings)?;
        Ok(Self {
            client,
            policy: CachePolicy::from_refresh(refresh),
        })
    }
}

pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    Ok(config::load(&cli.overrides)?)
}
