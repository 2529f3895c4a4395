use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, ObservabilityConfig, ServerConfig};
use service_core::error::AppError;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub service_name: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub curriculum: CurriculumConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthConfig {
    /// HS256 key shared with the token issuer.
    pub jwt_secret: Secret<String>,
    /// Emails that are always granted ROLE_ADMIN.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CurriculumConfig {
    pub base_url: String,
    pub api_key: Secret<String>,
    pub timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let builder = core_config::builder()?
            .set_default("service_name", "courses-service")?
            .set_default("database.max_connections", 10_i64)?
            .set_default("database.min_connections", 1_i64)?
            .set_default("curriculum.base_url", "https://api.ucsb.edu")?
            .set_default("curriculum.api_key", "")?
            .set_default("curriculum.timeout_secs", 10_i64)?;

        core_config::load(builder, &["auth.admin_emails"])
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.auth
            .admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}
