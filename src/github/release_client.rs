//! GitHub Releases REST client

use super::types::{ReleaseAsset, ReleaseDraft, ReleaseRecord};
use crate::config::GitHubConfig;
use crate::error::{ConfigError, GitHubError, Result};
use crate::payload::Payload;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Client for creating, attaching to and listing release records
#[derive(Debug, Clone)]
pub struct GitHubReleaseClient {
    http: reqwest::Client,
    config: GitHubConfig,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl GitHubReleaseClient {
    /// Create a client from an explicit configuration
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("apk_release_publisher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .build()?;

        Ok(Self { http, config })
    }

    /// Configuration this client was built from
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn token(&self) -> Result<&str> {
        self.config
            .token
            .as_deref()
            .ok_or_else(|| GitHubError::MissingToken.into())
    }

    fn releases_url(&self) -> Result<Url> {
        let mut url = self.config.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::Invalid {
                name: "GITHUB_API_URL".to_string(),
                reason: "API base cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(["repos", self.config.owner.as_str(), self.config.repo.as_str(), "releases"]);
        Ok(url)
    }

    async fn provider_message(response: reqwest::Response, fallback: &str) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Create a release record
    ///
    /// Requires a token. On a non-success response the provider's `message`
    /// is returned verbatim.
    pub async fn create_release(&self, draft: &ReleaseDraft) -> Result<ReleaseRecord> {
        let token = self.token()?;
        log::info!(
            "Creating release {} in {}/{}",
            draft.tag_name,
            self.config.owner,
            self.config.repo
        );

        let response = self
            .http
            .post(self.releases_url()?)
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(draft)
            .send()
            .await
            .map_err(|e| GitHubError::CreateFailed {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::provider_message(response, "Failed to create release").await;
            return Err(GitHubError::CreateFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let record: ReleaseRecord = response.json().await?;
        log::debug!("Created release id {} ({})", record.id, record.html_url);
        Ok(record)
    }

    /// Attach `payload` to an existing release record
    ///
    /// The record is not deleted when this fails.
    pub async fn upload_asset(&self, release: &ReleaseRecord, payload: &Payload) -> Result<ReleaseAsset> {
        let token = self.token()?;
        let failed = |status: u16, message: String| GitHubError::AssetUploadFailed {
            tag: release.tag_name.clone(),
            status,
            message,
        };

        let template = release
            .upload_url
            .as_deref()
            .ok_or_else(|| failed(0, "Release has no upload URL".to_string()))?;
        let mut url = asset_upload_url(template)
            .map_err(|e| failed(0, format!("Invalid upload URL '{template}': {e}")))?;
        url.query_pairs_mut().append_pair("name", payload.name());

        log::info!("Uploading {} to release {}", payload.name(), release.tag_name);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(CONTENT_TYPE, payload.content_type())
            .body(payload.bytes().clone())
            .send()
            .await
            .map_err(|e| failed(0, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::provider_message(response, "Failed to upload APK").await;
            return Err(failed(status.as_u16(), message).into());
        }

        Ok(response.json().await?)
    }

    /// List every release record, newest first (unauthenticated)
    pub async fn list_releases(&self) -> Result<Vec<ReleaseRecord>> {
        let response = self
            .http
            .get(self.releases_url()?)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::ListFailed {
                status: status.as_u16(),
            }
            .into());
        }

        Ok(response.json().await?)
    }
}

/// Strip the `{?name,label}` template suffix from an `upload_url`
pub fn asset_upload_url(template: &str) -> std::result::Result<Url, url::ParseError> {
    let base = template.split_once('{').map_or(template, |(base, _)| base);
    Url::parse(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_template_suffix_is_removed() {
        let url = asset_upload_url(
            "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}",
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://uploads.github.com/repos/o/r/releases/1/assets");
    }

    #[test]
    fn plain_upload_url_is_kept() {
        let url = asset_upload_url("http://127.0.0.1:9/upload").unwrap();
        assert_eq!(url.path(), "/upload");
    }

    #[test]
    fn releases_url_is_built_from_config() {
        let config = GitHubConfig::new("octo/app", "https://api.github.com").unwrap();
        let client = GitHubReleaseClient::new(config).unwrap();
        assert_eq!(
            client.releases_url().unwrap().as_str(),
            "https://api.github.com/repos/octo/app/releases"
        );
    }
}
