//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_LOG_FILE_PREFIX, DEFAULT_PORT};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub cors: CorsSettings,
    pub realtime: RealtimeSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Apply embedded migrations on startup.
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeSettings {
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub filter: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            // Plain PORT is what most hosting platforms inject
            .set_override_option("app.port", std::env::var("PORT").ok())?
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", i64::from(DEFAULT_PORT))?
            .set_default("app.name", "hortitech-server")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.run_migrations", true)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("realtime.channel_capacity", DEFAULT_EVENT_CHANNEL_CAPACITY as i64)?
            .set_default("logging.filter", "info")?
            .set_default("logging.file_prefix", DEFAULT_LOG_FILE_PREFIX)
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(overrides: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let mut builder = AppConfig::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    #[test]
    fn test_defaults_fill_everything_but_database_url() {
        let config = build(&[("database.url", "postgres://localhost/hortitech")]).unwrap();

        assert_eq!(config.app.port, 4000);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.run_migrations);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(config.realtime.channel_capacity, 256);
        assert!(config.logging.directory.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        let err: AppError = build(&[]).unwrap_err().into();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let config = build(&[
            ("database.url", "postgres://db/hortitech"),
            ("app.env", "production"),
            ("logging.directory", "/var/log/hortitech"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.logging.directory.as_deref(), Some("/var/log/hortitech"));
    }
}
