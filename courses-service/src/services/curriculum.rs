//! UCSB Academic Curriculums API client.
//!
//! Both operations return the upstream JSON document as a string. Lookups
//! the API rejects as unknown or unauthorized come back as a small error
//! document (`{"error": "..."}`) rather than an `Err`, so callers can decide
//! per endpoint whether that means "skip", "404" or "400".

use crate::config::CurriculumConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::lock;
use super::metrics::record_curriculum_request;

pub const ENROLL_CODE_NOT_FOUND: &str =
    r#"{"error": "Enroll code doesn't exist in that quarter."}"#;
pub const UNAUTHORIZED: &str = r#"{"error": "401: Unauthorized"}"#;

#[async_trait]
pub trait CurriculumService: Send + Sync {
    /// Course document for one enroll code in one quarter.
    async fn get_json_by_qtr_enroll_cd(
        &self,
        quarter: &str,
        enroll_cd: &str,
    ) -> Result<String, AppError>;

    /// Lecture plus every affiliated section for an enroll code.
    async fn get_all_sections(&self, enroll_cd: &str, quarter: &str) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct UcsbCurriculumClient {
    client: Client,
    base_url: Url,
    api_key: Secret<String>,
}

impl UcsbCurriculumClient {
    pub fn new(config: &CurriculumConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid curriculum base URL {}: {}",
                config.base_url,
                e
            ))
        })?;

        if config.api_key.expose_secret().is_empty() {
            warn!("Curriculum API key is empty; upstream calls will be rejected");
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, resource: &str, quarter: &str, enroll_cd: &str) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::ConfigError(anyhow::anyhow!("Curriculum base URL cannot be a base")))?
            .pop_if_empty()
            .extend(["academics", "curriculums", "v3", resource, quarter, enroll_cd]);
        Ok(url)
    }

    async fn fetch(&self, operation: &'static str, url: Url) -> Result<String, AppError> {
        let response = self
            .client
            .get(url)
            .header("ucsb-api-version", "1.0")
            .header("ucsb-api-key", self.api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                record_curriculum_request(operation, "error");
                AppError::from(e)
            })?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                record_curriculum_request(operation, "not_found");
                return Ok(ENROLL_CODE_NOT_FOUND.to_string());
            }
            StatusCode::UNAUTHORIZED => {
                record_curriculum_request(operation, "unauthorized");
                warn!("Curriculum API rejected the configured key");
                return Ok(UNAUTHORIZED.to_string());
            }
            s if !s.is_success() => {
                record_curriculum_request(operation, "error");
                return Err(AppError::BadGateway(format!(
                    "Curriculum API returned {}",
                    s
                )));
            }
            _ => {}
        }

        let body = response.text().await.map_err(|e| {
            record_curriculum_request(operation, "error");
            AppError::from(e)
        })?;
        debug!(status = %status, bytes = body.len(), "Curriculum API response");

        if body.trim() == "null" {
            record_curriculum_request(operation, "not_found");
            return Ok(ENROLL_CODE_NOT_FOUND.to_string());
        }

        record_curriculum_request(operation, "ok");
        Ok(body)
    }
}

#[async_trait]
impl CurriculumService for UcsbCurriculumClient {
    #[instrument(skip(self))]
    async fn get_json_by_qtr_enroll_cd(
        &self,
        quarter: &str,
        enroll_cd: &str,
    ) -> Result<String, AppError> {
        let url = self.endpoint("classsection", quarter, enroll_cd)?;
        self.fetch("classsection", url).await
    }

    #[instrument(skip(self))]
    async fn get_all_sections(&self, enroll_cd: &str, quarter: &str) -> Result<String, AppError> {
        let url = self.endpoint("classes", quarter, enroll_cd)?;
        self.fetch("classes", url).await
    }
}

/// A call observed by [`MockCurriculumService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurriculumCall {
    Section { quarter: String, enroll_cd: String },
    AllSections { enroll_cd: String, quarter: String },
}

/// Scripted curriculum API. Unknown lookups answer with the
/// enroll-code-not-found document.
#[derive(Default)]
pub struct MockCurriculumService {
    sections: HashMap<(String, String), String>,
    all_sections: HashMap<(String, String), String>,
    unavailable: bool,
    calls: Mutex<Vec<CurriculumCall>>,
}

impl MockCurriculumService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, quarter: &str, enroll_cd: &str, json: &str) -> Self {
        self.sections
            .insert((quarter.to_string(), enroll_cd.to_string()), json.to_string());
        self
    }

    pub fn with_all_sections(mut self, enroll_cd: &str, quarter: &str, json: &str) -> Self {
        self.all_sections
            .insert((enroll_cd.to_string(), quarter.to_string()), json.to_string());
        self
    }

    /// Every call fails as if the upstream were down.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn calls(&self) -> Vec<CurriculumCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn answer(&self, found: Option<&String>) -> Result<String, AppError> {
        if self.unavailable {
            return Err(AppError::BadGateway("Curriculum API unavailable".to_string()));
        }
        Ok(found
            .cloned()
            .unwrap_or_else(|| ENROLL_CODE_NOT_FOUND.to_string()))
    }
}

#[async_trait]
impl CurriculumService for MockCurriculumService {
    async fn get_json_by_qtr_enroll_cd(
        &self,
        quarter: &str,
        enroll_cd: &str,
    ) -> Result<String, AppError> {
        lock(&self.calls, "curriculum calls")?.push(CurriculumCall::Section {
            quarter: quarter.to_string(),
            enroll_cd: enroll_cd.to_string(),
        });
        self.answer(
            self.sections
                .get(&(quarter.to_string(), enroll_cd.to_string())),
        )
    }

    async fn get_all_sections(&self, enroll_cd: &str, quarter: &str) -> Result<String, AppError> {
        lock(&self.calls, "curriculum calls")?.push(CurriculumCall::AllSections {
            enroll_cd: enroll_cd.to_string(),
            quarter: quarter.to_string(),
        });
        self.answer(
            self.all_sections
                .get(&(enroll_cd.to_string(), quarter.to_string())),
        )
    }
}

/// True when the document is the API's `{"error": ...}` shape.
pub fn is_error_document(json: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json)
        .map(|value| value.get("error").is_some())
        .unwrap_or(false)
}
