use std::env;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::client::ClientConfig;
use crate::supplier_request::DEFAULT_ITINERARY_REQUEST_TYPE;

const ENV_PREFIX: &str = "FLIGHT_SEARCH";
const DEFAULT_LOG_FILTER: &str = "gds_flight_search=info,tower_http=debug";

// Older deployments export these flat names; they only seed defaults.
const LEGACY_ENV: [(&str, &str); 5] = [
    ("CLIENTID", "sabre.client_id"),
    ("CLIENTSECRET", "sabre.client_secret"),
    ("PCC", "sabre.pcc"),
    ("URL", "sabre.search_url"),
    ("SABREAUTHURL", "sabre.auth_url"),
];

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub sabre: SabreSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SabreSettings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub pcc: String,
    #[serde(default)]
    pub search_url: String,
    #[serde(default)]
    pub auth_url: String,
    pub timeout_ms: u64,
    pub itinerary_request_type: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Settings {
    /// Layers defaults, legacy variables, config files and `FLIGHT_SEARCH__*` variables.
    pub fn load() -> Result<Self, SettingsError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = with_legacy_defaults(base_builder()?, |name| env::var(name).ok())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_config(builder.build()?)
    }

    pub fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let required = [
            ("sabre.client_id", &self.sabre.client_id),
            ("sabre.client_secret", &self.sabre.client_secret),
            ("sabre.pcc", &self.sabre.pcc),
            ("sabre.search_url", &self.sabre.search_url),
            ("sabre.auth_url", &self.sabre.auth_url),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(SettingsError::Missing(*key)),
            None => Ok(()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl From<&SabreSettings> for ClientConfig {
    fn from(sabre: &SabreSettings) -> Self {
        ClientConfig {
            search_url: sabre.search_url.clone(),
            auth_url: sabre.auth_url.clone(),
            client_id: sabre.client_id.clone(),
            client_secret: sabre.client_secret.clone(),
            pseudo_city_code: sabre.pcc.clone(),
            timeout_ms: sabre.timeout_ms,
            itinerary_request_type: sabre.itinerary_request_type.clone(),
        }
    }
}

fn base_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("sabre.timeout_ms", 30_000_i64)?
        .set_default("sabre.itinerary_request_type", DEFAULT_ITINERARY_REQUEST_TYPE)?
        .set_default("logging.filter", DEFAULT_LOG_FILTER)
}

fn with_legacy_defaults<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (name, key) in LEGACY_ENV {
        if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
            builder = builder.set_default(key, value)?;
        }
    }
    Ok(builder)
}
