use std::net::SocketAddr;

use anyhow::Context;
use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Reads `DB_PATH`, `HOST` and `PORT` from the environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_source(Environment::default())
    }

    fn from_source(source: Environment) -> anyhow::Result<Self> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()
            .context("DB_PATH must be set, PORT must be a port number")
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}
