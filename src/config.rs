//! Configuration loading and validation.
//!
//! Configuration is merged from a YAML file and `MOCK_VWS_`-prefixed
//! environment variables, with the environment winning. Nested keys use a
//! double underscore, e.g. `MOCK_VWS_PROCESSING_DURATION=1s`.

use crate::database::{DatabaseState, VuforiaDatabase};
use crate::target::TargetStatus;
use anyhow::{bail, Context};
use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "mock-vws", about = "Mock of the Vuforia Web Services target management API")]
pub struct Args {
    /// Path to the YAML configuration file.
    #[arg(short = 'f', long, env = "MOCK_VWS_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    pub validate: bool,
}

/// Credentials and state for one database, as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSeed {
    pub database_name: String,
    pub server_access_key: String,
    pub server_secret_key: String,
    pub client_access_key: String,
    pub client_secret_key: String,
    #[serde(default = "default_database_state")]
    pub state: DatabaseState,
}

fn default_database_state() -> DatabaseState {
    DatabaseState::Working
}

impl From<DatabaseSeed> for VuforiaDatabase {
    fn from(seed: DatabaseSeed) -> Self {
        VuforiaDatabase::builder()
            .database_name(seed.database_name)
            .server_access_key(seed.server_access_key)
            .server_secret_key(seed.server_secret_key)
            .client_access_key(seed.client_access_key)
            .client_secret_key(seed.client_secret_key)
            .state(seed.state)
            .build()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long a target stays in `processing` after creation or update.
    #[serde(with = "humantime_serde", default = "default_processing_duration")]
    pub processing_duration: Duration,
    /// Terminal status reached after processing. Harnesses set `failed` to
    /// exercise client failure paths.
    #[serde(default = "default_processed_target_status")]
    pub processed_target_status: TargetStatus,
    /// Databases registered at startup.
    #[serde(default)]
    pub databases: Vec<DatabaseSeed>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_processing_duration() -> Duration {
    Duration::from_millis(200)
}

fn default_processed_target_status() -> TargetStatus {
    TargetStatus::Success
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            processing_duration: default_processing_duration(),
            processed_target_status: default_processed_target_status(),
            databases: Vec::new(),
        }
    }
}

impl Config {
    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("MOCK_VWS_").split("__"))
    }

    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let config: Config = Self::figment(args)
            .extract()
            .context("failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.processed_target_status == TargetStatus::Processing {
            bail!("processed_target_status must be a terminal status (success or failed)");
        }
        for (i, seed) in self.databases.iter().enumerate() {
            for other in &self.databases[i + 1..] {
                if seed.database_name == other.database_name {
                    bail!("duplicate database name {:?}", seed.database_name);
                }
                if seed.server_access_key == other.server_access_key {
                    bail!("duplicate server access key {:?}", seed.server_access_key);
                }
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
