//! Publisher configuration.
//!
//! Every backend value is an explicitly constructed setting passed into the
//! clients that need it. Defaults point at the People Tracker deployment;
//! override through environment variables or explicit construction for
//! staging and tests.

use crate::error::{ConfigError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Default storage bucket holding the single published APK
pub const DEFAULT_BUCKET: &str = "people-tracker-app-apk";

/// Default GitHub repository that hosts release records
pub const DEFAULT_GITHUB_REPO: &str = "sendilb191/people-tracker-pages";

/// Default GitHub REST API base URL
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Default custom-scheme URI handled by the installed app
pub const DEFAULT_DEEP_LINK: &str = "peopletracker://open";

/// Default upload ceiling in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 100;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Suffix identifying publishable binaries (compared case-insensitively)
pub const APK_SUFFIX: &str = ".apk";

/// Content type sent with every APK upload
pub const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";

/// Object-storage backend settings.
///
/// All three values are non-secret and client-embedded; the key is the
/// public read-only key of the project. `Debug` still redacts it.
#[derive(Clone)]
pub struct StorageConfig {
    /// Storage endpoint, e.g. `https://xyz.supabase.co`
    pub endpoint: Url,
    /// Bucket holding the published APK
    pub bucket: String,
    /// Public (anon) access key
    pub anon_key: String,
    /// Upload ceiling in bytes
    pub max_upload_bytes: u64,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("bucket", &self.bucket)
            .field("anon_key", &"[REDACTED]")
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl StorageConfig {
    /// Build a storage configuration from explicit values
    pub fn new(endpoint: &str, bucket: impl Into<String>, anon_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: parse_url("SUPABASE_URL", endpoint)?,
            bucket: bucket.into(),
            anon_key: anon_key.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * BYTES_PER_MB,
        })
    }

    /// Override the upload ceiling (in megabytes)
    pub fn with_max_upload_mb(mut self, mb: u64) -> Result<Self> {
        self.max_upload_bytes = megabytes(mb)?;
        Ok(self)
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SUPABASE_URL` (required)
    /// - `SUPABASE_ANON_KEY` (required)
    /// - `STORAGE_BUCKET` (default: `people-tracker-app-apk`)
    /// - `APK_MAX_UPLOAD_MB` (default: 100)
    pub fn from_env() -> Result<Self> {
        let endpoint = required_env("SUPABASE_URL")?;
        let anon_key = required_env("SUPABASE_ANON_KEY")?;
        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());
        let max_mb = match std::env::var("APK_MAX_UPLOAD_MB") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "APK_MAX_UPLOAD_MB".to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };

        Self::new(&endpoint, bucket, anon_key)?.with_max_upload_mb(max_mb)
    }
}

/// GitHub release API settings
#[derive(Clone)]
pub struct GitHubConfig {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API base URL
    pub api_base: Url,
    /// Token used for authenticated calls (never sent when listing)
    pub token: Option<String>,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GitHubConfig {
    /// Build a configuration from an `owner/repo` slug or GitHub URL
    pub fn new(repository: &str, api_base: &str) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        Ok(Self {
            owner,
            repo,
            api_base: parse_url("GITHUB_API_URL", api_base)?,
            token: None,
        })
    }

    /// Attach a token for authenticated calls
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GITHUB_REPO` (default: `sendilb191/people-tracker-pages`)
    /// - `GITHUB_API_URL` (default: `https://api.github.com`)
    /// - `GH_TOKEN`, then `GITHUB_TOKEN` (optional)
    pub fn from_env() -> Result<Self> {
        let repository =
            std::env::var("GITHUB_REPO").unwrap_or_else(|_| DEFAULT_GITHUB_REPO.to_string());
        let api_base =
            std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_GITHUB_API.to_string());
        let token = std::env::var("GH_TOKEN")
            .ok()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok());

        Ok(Self::new(&repository, &api_base)?.with_token(token))
    }

    /// Provider web page listing every release, used as a manual fallback
    pub fn releases_page(&self) -> String {
        format!("https://github.com/{}/{}/releases", self.owner, self.repo)
    }
}

/// Deep-link launcher settings
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Custom-scheme URI handled by the installed app
    pub deep_link: String,
    /// How long to wait for a success signal before showing the fallback
    pub timeout: Duration,
    /// Delay before the direct-navigation attempt
    pub navigation_delay: Duration,
    /// Where the fallback UI sends the visitor
    pub download_url: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            deep_link: DEFAULT_DEEP_LINK.to_string(),
            timeout: Duration::from_millis(2500),
            navigation_delay: Duration::from_millis(100),
            download_url: "releases.html".to_string(),
        }
    }
}

/// Convert megabytes to bytes, rejecting values that do not fit in a `u64`
pub fn megabytes(mb: u64) -> Result<u64> {
    mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
        ConfigError::Invalid {
            name: "APK_MAX_UPLOAD_MB".to_string(),
            reason: format!("{mb} MB does not fit in a byte count"),
        }
        .into()
    })
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::Missing {
                name: name.to_string(),
            }
            .into()
        })
}

fn parse_url(name: &str, raw: &str) -> Result<Url> {
    Url::parse(raw.trim_end_matches('/')).map_err(|e| {
        ConfigError::Invalid {
            name: name.to_string(),
            reason: format!("'{raw}': {e}"),
        }
        .into()
    })
}

/// Split an `owner/repo` slug or `https://github.com/owner/repo` URL
pub fn parse_repository(input: &str) -> Result<(String, String)> {
    static GITHUB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^https://github\.com/(?P<owner>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?/?$")
            .expect("GitHub URL regex is valid")
    });

    if let Some(caps) = GITHUB_URL_RE.captures(input) {
        return Ok((caps["owner"].to_string(), caps["repo"].to_string()));
    }

    if let Some((owner, repo)) = input.split_once('/')
        && !owner.is_empty()
        && !repo.is_empty()
        && !repo.contains('/')
    {
        return Ok((owner.to_string(), repo.trim_end_matches(".git").to_string()));
    }

    Err(ConfigError::Invalid {
        name: "GITHUB_REPO".to_string(),
        reason: format!("'{input}' is not owner/repo or a GitHub URL"),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slug_and_url() {
        assert_eq!(
            parse_repository("sendilb191/people-tracker-pages").unwrap(),
            ("sendilb191".to_string(), "people-tracker-pages".to_string())
        );
        assert_eq!(
            parse_repository("https://github.com/octo/app.git").unwrap(),
            ("octo".to_string(), "app".to_string())
        );
        assert!(parse_repository("no-slash").is_err());
        assert!(parse_repository("a/b/c").is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let storage = StorageConfig::new("https://x.supabase.co", "bucket", "secret-key").unwrap();
        assert!(!format!("{storage:?}").contains("secret-key"));

        let github = GitHubConfig::new("o/r", DEFAULT_GITHUB_API)
            .unwrap()
            .with_token(Some("ghp_abc".to_string()));
        assert!(!format!("{github:?}").contains("ghp_abc"));
    }

    #[test]
    fn blank_token_is_dropped() {
        let github = GitHubConfig::new("o/r", DEFAULT_GITHUB_API)
            .unwrap()
            .with_token(Some("   ".to_string()));
        assert!(github.token.is_none());
    }

    #[test]
    fn default_ceiling_is_100_mb() {
        let storage = StorageConfig::new("https://x.supabase.co", "b", "k").unwrap();
        assert_eq!(storage.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(storage.with_max_upload_mb(5).unwrap().max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn huge_ceiling_is_rejected_instead_of_overflowing() {
        assert!(megabytes(u64::MAX / 1024).is_err());
        assert!(megabytes(u64::MAX).is_err());
        assert_eq!(megabytes(u64::MAX / BYTES_PER_MB).unwrap(), (u64::MAX / BYTES_PER_MB) * BYTES_PER_MB);

        let storage = StorageConfig::new("https://x.supabase.co", "b", "k").unwrap();
        assert!(storage.with_max_upload_mb(u64::MAX).is_err());
    }

    #[test]
    fn releases_page_points_at_repo() {
        let github = GitHubConfig::new("octo/app", DEFAULT_GITHUB_API).unwrap();
        assert_eq!(github.releases_page(), "https://github.com/octo/app/releases");
    }
}
