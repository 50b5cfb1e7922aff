use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use contentauth_core::SchemaMapping;
use contentauth_core::schema::sql::is_valid_identifier;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::constants::{CONFIG_FILE, DEFAULT_NORMALIZED_EMAIL_COLUMN, env, prod};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Config(#[from] ConfigError),
    #[error("Missing required setting `{0}`")]
    Missing(&'static str),
    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Failed to read schema mapping from {path}: {reason}")]
    SchemaMapping { path: String, reason: String },
}

/// Origins allowed by CORS. Read from a list or a comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for AllowedOrigins {
    fn from(origins: Vec<String>) -> Self {
        Self(origins)
    }
}

impl<'de> Deserialize<'de> for AllowedOrigins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<String>),
            Csv(String),
        }

        let origins = match Raw::deserialize(deserializer)? {
            Raw::List(list) => list,
            Raw::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };

        Ok(Self(
            origins
                .into_iter()
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub address: String,
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
    /// Create missing mapped tables at start-up.
    pub apply_schema: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TurnstileSettings {
    pub secret_key: Secret<String>,
    pub base_url: String,
    pub timeout_in_millis: u64,
}

impl TurnstileSettings {
    /// Challenge verification runs only with a secret configured.
    pub fn is_enabled(&self) -> bool {
        !self.secret_key.expose_secret().trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizationSettings {
    pub enabled: bool,
    pub column: String,
    /// JSON file holding a schema mapping.
    pub schema_mapping_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub postgres: PostgresSettings,
    pub turnstile: TurnstileSettings,
    pub normalization: NormalizationSettings,
}

impl Settings {
    /// Loads defaults, then `config/default.json` if present, then
    /// `CONTENTAUTH__SECTION__KEY` variables. `DATABASE_URL` and
    /// `TURNSTILE_SECRET_KEY` override everything else.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(env::CONFIG_ENV_PREFIX)
                    .separator(env::CONFIG_ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .set_override_option("postgres.url", std::env::var(env::DATABASE_URL_ENV_VAR).ok())?
            .set_override_option(
                "turnstile.secret_key",
                std::env::var(env::TURNSTILE_SECRET_KEY_ENV_VAR).ok(),
            )?
            .set_override_option(
                "application.allowed_origins",
                std::env::var(env::ALLOWED_ORIGINS_ENV_VAR).ok(),
            )?
            .build()?;

        Self::from_config(config)
    }

    /// Builder seeded with every default, for callers adding their own sources.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        Ok(Config::builder()
            .set_default("application.address", prod::APP_ADDRESS)?
            .set_default("application.allowed_origins", "")?
            .set_default("postgres.url", "")?
            .set_default("postgres.max_connections", prod::postgres::MAX_CONNECTIONS as i64)?
            .set_default("postgres.apply_schema", false)?
            .set_default("turnstile.secret_key", "")?
            .set_default("turnstile.base_url", prod::turnstile::BASE_URL)?
            .set_default(
                "turnstile.timeout_in_millis",
                prod::turnstile::TIMEOUT.as_millis() as i64,
            )?
            .set_default("normalization.enabled", true)?
            .set_default("normalization.column", DEFAULT_NORMALIZED_EMAIL_COLUMN)?)
    }

    pub fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.postgres.url.expose_secret().trim().is_empty() {
            return Err(SettingsError::Missing("postgres.url"));
        }
        if self.postgres.max_connections == 0 {
            return Err(SettingsError::Invalid {
                key: "postgres.max_connections",
                reason: "must be at least 1".to_string(),
            });
        }
        if !is_valid_identifier(&self.normalization.column) {
            return Err(SettingsError::Invalid {
                key: "normalization.column",
                reason: format!("`{}` is not a valid column name", self.normalization.column),
            });
        }
        if self.turnstile.is_enabled() {
            reqwest::Url::parse(&self.turnstile.base_url).map_err(|e| SettingsError::Invalid {
                key: "turnstile.base_url",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// The configured schema mapping, or the default naming when none is set.
    pub fn schema_mapping(&self) -> Result<SchemaMapping, SettingsError> {
        let Some(path) = &self.normalization.schema_mapping_path else {
            return Ok(SchemaMapping::default());
        };

        let error = |reason: String| SettingsError::SchemaMapping {
            path: path.clone(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| error(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| error(e.to_string()))
    }
}
