use std::time::Duration;
use serde::Deserialize;
use thiserror::Error;

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_fluctuation_interval_secs() -> u64 {
    10
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("FLUCTUATION_INTERVAL_SECS must be greater than zero")]
    ZeroInterval,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_fluctuation_interval_secs")]
    pub fluctuation_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        if config.fluctuation_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn fluctuation_interval(&self) -> Duration {
        Duration::from_secs(self.fluctuation_interval_secs)
    }
}
