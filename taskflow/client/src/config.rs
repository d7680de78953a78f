use serde::Deserialize;
use std::collections::HashMap;

const ENV_PREFIX: &str = "TASKFLOW";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the record store service.
    pub record_store_url: String,
    /// Project the record store scopes collections to.
    pub project_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Config {
    /// Loads configuration from `TASKFLOW_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_environment(environment())
    }

    /// Loads configuration from an explicit set of `TASKFLOW_*` variables
    /// instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> anyhow::Result<Self> {
        Self::from_environment(environment().source(Some(vars.into_iter().collect())))
    }

    fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(environment)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

fn default_collection() -> String {
    "tasks".to_string()
}

fn default_page_size() -> u32 {
    100
}
