//! Layered configuration shared by every service in the workspace.
//!
//! Sources are applied lowest to highest precedence: built-in defaults, an
//! optional `configuration.{toml,yaml,json}` file in the working directory, and
//! `APP__SECTION__KEY` environment variables (a `.env` file is loaded first).

use crate::error::AppError;
use config::{builder::DefaultState, Config as Cfg, ConfigBuilder, File};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// OTLP collector endpoint; span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

/// Start a builder pre-populated with the defaults every service shares.
pub fn builder() -> Result<ConfigBuilder<DefaultState>, AppError> {
    dotenvy::dotenv().ok();

    Ok(Cfg::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("observability.log_level", "info")?)
}

/// Layer the configuration file and environment over `builder` and
/// deserialize the result.
///
/// `list_keys` names settings whose environment value is a comma separated list.
pub fn load<T: DeserializeOwned>(
    builder: ConfigBuilder<DefaultState>,
    list_keys: &[&str],
) -> Result<T, AppError> {
    let mut environment = config::Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true);

    if !list_keys.is_empty() {
        environment = environment.list_separator(",");
        for key in list_keys {
            environment = environment.with_list_parse_key(key);
        }
    }

    let config = builder
        .add_source(File::with_name("configuration").required(false))
        .add_source(environment)
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        server: ServerConfig,
        observability: ObservabilityConfig,
    }

    #[test]
    fn defaults_fill_shared_sections() {
        let sample: Sample = load(builder().unwrap(), &[]).unwrap();

        assert!(!sample.server.host.is_empty());
        assert!(!sample.observability.log_level.is_empty());
    }
}
