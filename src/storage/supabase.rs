//! Supabase Storage REST client

use super::{ObjectStore, StorageObject, UploadOptions};
use crate::config::StorageConfig;
use crate::error::{ConfigError, ReleaseError, Result, StorageError};
use crate::payload::Payload;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Page size requested from the list endpoint
const LIST_LIMIT: u32 = 100;

/// Object-storage client bound to one bucket
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    http: reqwest::Client,
    config: StorageConfig,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl From<ListedObject> for StorageObject {
    fn from(listed: ListedObject) -> Self {
        Self {
            name: listed.name,
            size: listed.metadata.and_then(|m| m.size),
            updated_at: listed.updated_at,
        }
    }
}

impl SupabaseStorage {
    /// Create a client; the anon key is sent as both `apikey` and bearer token
    pub fn new(config: StorageConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.anon_key).map_err(|_| ConfigError::Invalid {
            name: "SUPABASE_ANON_KEY".to_string(),
            reason: "contains characters not allowed in an HTTP header".to_string(),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key)).map_err(|_| {
            ConfigError::Invalid {
                name: "SUPABASE_ANON_KEY".to_string(),
                reason: "contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .user_agent(concat!("apk_release_publisher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    /// Configuration this client was built from
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// `{endpoint}/{segments...}` with each segment percent-encoded
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::Invalid {
                name: "SUPABASE_URL".to_string(),
                reason: "endpoint cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn provider_message(response: reqwest::Response, fallback: &str) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("{fallback} (HTTP {})", status.as_u16()))
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    fn bucket(&self) -> &str {
        &self.config.bucket
    }

    async fn list(&self) -> Result<Vec<StorageObject>> {
        let url = self.endpoint_url(&["storage", "v1", "object", "list", self.config.bucket.as_str()])?;
        let body = json!({
            "prefix": "",
            "limit": LIST_LIMIT,
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" },
        });

        let response = self.http.post(url).json(&body).send().await.map_err(|e| {
            StorageError::ListFailed {
                bucket: self.config.bucket.clone(),
                message: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            let message = Self::provider_message(response, "Failed to list files").await;
            return Err(StorageError::ListFailed {
                bucket: self.config.bucket.clone(),
                message,
            }
            .into());
        }

        let listed: Vec<ListedObject> = response.json().await.map_err(|e| {
            StorageError::ListFailed {
                bucket: self.config.bucket.clone(),
                message: e.to_string(),
            }
        })?;
        log::debug!("Bucket '{}' lists {} object(s)", self.config.bucket, listed.len());
        Ok(listed.into_iter().map(StorageObject::from).collect())
    }

    async fn remove(&self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        let url = self.endpoint_url(&["storage", "v1", "object", self.config.bucket.as_str()])?;
        let failed = |message: String| -> ReleaseError {
            StorageError::RemoveFailed {
                bucket: self.config.bucket.clone(),
                count: names.len(),
                message,
            }
            .into()
        };

        let response = self
            .http
            .delete(url)
            .json(&json!({ "prefixes": names }))
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(
                Self::provider_message(response, "Failed to delete files").await,
            ));
        }

        log::info!("Deleted {} object(s) from '{}'", names.len(), self.config.bucket);
        Ok(())
    }

    async fn upload(&self, payload: &Payload, options: &UploadOptions) -> Result<()> {
        let url = self.endpoint_url(&["storage", "v1", "object", self.config.bucket.as_str(), payload.name()])?;
        let content_type = options
            .content_type
            .as_deref()
            .unwrap_or_else(|| payload.content_type());

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(payload.bytes().clone())
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                name: payload.name().to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let message = Self::provider_message(response, "Failed to upload APK").await;
            return Err(StorageError::UploadFailed {
                name: payload.name().to_string(),
                message,
            }
            .into());
        }

        log::info!(
            "Uploaded {} ({} bytes) to '{}'",
            payload.name(),
            payload.size(),
            self.config.bucket
        );
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        match self.endpoint_url(&["storage", "v1", "object", "public", self.config.bucket.as_str(), name]) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}/storage/v1/object/public/{}/{}",
                self.config.endpoint.as_str().trim_end_matches('/'),
                self.config.bucket,
                name
            ),
        }
    }

    async fn ping(&self) -> Result<u16> {
        let url = self.endpoint_url(&["rest", "v1", ""])?;
        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            StorageError::Unreachable {
                endpoint: url.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(response.status().as_u16())
    }
}
