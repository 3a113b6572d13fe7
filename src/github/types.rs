//! GitHub release API wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a create-release request
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseDraft {
    /// Version tag (unique per repository)
    pub tag_name: String,
    /// Display name
    pub name: String,
    /// Free-text release notes
    pub body: String,
    /// Mark the release as a pre-release
    pub prerelease: bool,
}

/// A release record as returned by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseRecord {
    /// Release ID
    pub id: u64,
    /// Version tag
    pub tag_name: String,
    /// Display name; may be empty or missing
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes
    #[serde(default)]
    pub body: Option<String>,
    /// Pre-release flag
    #[serde(default)]
    pub prerelease: bool,
    /// Publish time; drafts have none
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Release page on github.com
    #[serde(default)]
    pub html_url: String,
    /// RFC 6570 template for attaching assets
    #[serde(default)]
    pub upload_url: Option<String>,
    /// Attached binaries
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseRecord {
    /// Display name, falling back to the tag when the name is blank
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.tag_name)
    }

    /// Attachments whose names carry the APK suffix
    pub fn apk_assets(&self) -> impl Iterator<Item = &ReleaseAsset> {
        self.assets
            .iter()
            .filter(|a| crate::payload::has_apk_suffix(&a.name))
    }
}

/// A binary attached to a release record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseAsset {
    /// Asset file name
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Public download URL
    pub browser_download_url: String,
}
