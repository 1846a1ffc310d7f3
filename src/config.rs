// src/config.rs

use anyhow::Context;
use sqlx::SqlitePool;
use std::{env, path::PathBuf, str::FromStr};

use crate::{
    db::{self, HistoryRepository, ProductRepository},
    services::ProductService,
};

const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub seed_demo_data: bool,
    pub max_upload_bytes: usize,
    /// Built frontend bundle, served for every path the API does not handle.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_max_connections: 5,
            seed_demo_data: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: None,
        }
    }
}

// Blank or unset values fall back to the default.
fn parse_var<T>(name: &str, raw: Option<&str>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value
            .parse()
            .with_context(|| format!("{name} has an invalid value: {value:?}")),
        _ => Ok(default),
    }
}

fn parse_flag(name: &str, raw: Option<&str>, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{name} must be a boolean, got {other:?}"),
    }
}

impl Config {
    /// Reads the configuration from the environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Malformed numbers or
    /// flags are errors, so a typo stops startup instead of silently using a default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Config::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let db_max_connections = parse_var(
            "DB_MAX_CONNECTIONS",
            lookup("DB_MAX_CONNECTIONS").as_deref(),
            defaults.db_max_connections,
        )?;
        if db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_max_connections,
            seed_demo_data: parse_flag(
                "SEED_DEMO_DATA",
                lookup("SEED_DEMO_DATA").as_deref(),
                defaults.seed_demo_data,
            )?,
            max_upload_bytes: parse_var(
                "MAX_UPLOAD_BYTES",
                lookup("MAX_UPLOAD_BYTES").as_deref(),
                defaults.max_upload_bytes,
            )?,
            static_dir: var("STATIC_DIR").map(PathBuf::from),
        })
    }
}

// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
    pub product_service: ProductService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = db::connect(&config.database_url, config.db_max_connections)
            .await
            .with_context(|| format!("failed to open database {}", config.database_url))?;

        tracing::info!("✅ Database ready, migrations applied");

        Ok(Self::from_pool(db_pool, config))
    }

    pub fn from_pool(db_pool: SqlitePool, config: Config) -> Self {
        let product_service = ProductService::new(ProductRepository::new(), HistoryRepository::new());

        Self {
            db_pool,
            config,
            product_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, "sqlite://inventory.db?mode=rwc");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert!(config.seed_demo_data);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("DATABASE_URL", ""),
            ("DB_MAX_CONNECTIONS", "  "),
            ("SEED_DEMO_DATA", ""),
            ("MAX_UPLOAD_BYTES", " "),
            ("STATIC_DIR", "  "),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite://inventory.db?mode=rwc");
        assert_eq!(config.db_max_connections, 5);
        assert!(config.seed_demo_data);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn explicit_values_are_used() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", " 12 "),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("STATIC_DIR", "frontend/build"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.static_dir, Some(PathBuf::from("frontend/build")));
    }

    #[test]
    fn boolean_spellings() {
        for (raw, expected) in [
            ("1", true),
            ("TRUE", true),
            ("yes", true),
            (" On ", true),
            ("0", false),
            ("false", false),
            ("No", false),
            ("off", false),
        ] {
            let config = config_from(&[("SEED_DEMO_DATA", raw)]).unwrap();
            assert_eq!(config.seed_demo_data, expected, "SEED_DEMO_DATA={raw:?}");
        }
    }

    #[test]
    fn malformed_values_stop_startup() {
        for vars in [
            [("SEED_DEMO_DATA", "maybe")],
            [("DB_MAX_CONNECTIONS", "five")],
            [("DB_MAX_CONNECTIONS", "-1")],
            [("MAX_UPLOAD_BYTES", "5MB")],
        ] {
            assert!(config_from(&vars).is_err(), "{vars:?} was accepted");
        }
    }

    #[test]
    fn zero_connections_is_rejected() {
        let err = config_from(&[("DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}
