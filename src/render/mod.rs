//! HTML fragment rendering for the download pages.
//!
//! Every free-text value coming back from a provider (names, notes, URLs)
//! passes through handlebars' HTML escaping before it reaches markup.

mod templates;

use crate::error::Result;
use crate::github::ReleaseRecord;
use crate::payload::has_apk_suffix;
use crate::storage::StorageObject;
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

/// Hint shown under the empty-state heading
pub const EMPTY_HINT: &str = "Click \"Upload New Release\" above to create your first release";

/// Labelled link to the provider's own listing, shown when loading fails
#[derive(Debug, Clone, Serialize)]
pub struct FallbackLink {
    /// Link target
    pub url: String,
    /// Link text
    pub label: String,
}

#[derive(Debug, Serialize)]
struct AssetView {
    name: String,
    url: String,
    size_mb: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReleaseView {
    title: String,
    latest: bool,
    prerelease: bool,
    date: Option<String>,
    notes: Option<String>,
    assets: Vec<AssetView>,
    page_url: String,
}

/// One downloadable object in the bucket listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
    /// Object name
    pub name: String,
    /// Public download URL
    pub url: String,
    /// Size in bytes, if known
    pub size: Option<u64>,
    /// Last modification time, if known
    pub updated_at: Option<DateTime<Utc>>,
}

impl BucketEntry {
    /// Entry for `object`, downloadable at `url`
    pub fn from_object(object: StorageObject, url: String) -> Self {
        Self {
            name: object.name,
            url,
            size: object.size,
            updated_at: object.updated_at,
        }
    }
}

/// Template registry for listings, placeholders, the open page and docs
#[derive(Debug)]
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Register every template
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string("releases", templates::RELEASES)?;
        registry.register_template_string("empty", templates::EMPTY)?;
        registry.register_template_string("error", templates::ERROR)?;
        registry.register_template_string("open_page", templates::OPEN_PAGE)?;
        registry.register_template_string("docs_page", templates::DOCS_PAGE)?;
        registry.register_template_string("docs_error", templates::DOCS_ERROR)?;
        Ok(Self { registry })
    }

    /// Release records, first one marked latest
    pub fn releases(&self, releases: &[ReleaseRecord]) -> Result<String> {
        if releases.is_empty() {
            return self.empty();
        }

        let views: Vec<ReleaseView> = releases
            .iter()
            .enumerate()
            .map(|(index, release)| ReleaseView {
                title: release.display_name().to_string(),
                latest: index == 0,
                prerelease: release.prerelease,
                date: release.published_at.as_ref().map(format_date),
                notes: release.body.clone().filter(|b| !b.is_empty()),
                assets: release
                    .apk_assets()
                    .map(|asset| AssetView {
                        name: asset.name.clone(),
                        url: asset.browser_download_url.clone(),
                        size_mb: Some(format_megabytes(asset.size)),
                    })
                    .collect(),
                page_url: release.html_url.clone(),
            })
            .collect();

        Ok(self.registry.render("releases", &json!({ "releases": views }))?)
    }

    /// Bucket objects, already in newest-first backend order
    ///
    /// Only APK objects are shown; no APK renders the empty placeholder.
    pub fn bucket(&self, entries: &[BucketEntry]) -> Result<String> {
        let views: Vec<ReleaseView> = entries
            .iter()
            .filter(|entry| has_apk_suffix(&entry.name))
            .enumerate()
            .map(|(index, entry)| ReleaseView {
                title: entry.name.clone(),
                latest: index == 0,
                prerelease: false,
                date: entry.updated_at.as_ref().map(format_date),
                notes: None,
                assets: vec![AssetView {
                    name: entry.name.clone(),
                    url: entry.url.clone(),
                    size_mb: entry.size.map(format_megabytes),
                }],
                page_url: entry.url.clone(),
            })
            .collect();

        if views.is_empty() {
            return self.empty();
        }
        Ok(self.registry.render("releases", &json!({ "releases": views }))?)
    }

    /// "No releases" placeholder
    pub fn empty(&self) -> Result<String> {
        Ok(self.registry.render("empty", &json!({ "hint": EMPTY_HINT }))?)
    }

    /// Load-failure placeholder linking to the provider's own listing
    pub fn error(&self, fallback: &FallbackLink) -> Result<String> {
        Ok(self.registry.render(
            "error",
            &json!({ "fallback_url": fallback.url, "fallback_label": fallback.label }),
        )?)
    }

    /// Deep-link page with exactly one of the launching/fallback states visible
    pub fn open_page(&self, fallback: bool, download_url: &str) -> Result<String> {
        Ok(self.registry.render(
            "open_page",
            &json!({ "fallback": fallback, "download_url": download_url }),
        )?)
    }

    /// Documentation page around already-rendered HTML
    pub fn docs_page(&self, body_html: &str) -> Result<String> {
        Ok(self.registry.render("docs_page", &json!({ "body": body_html }))?)
    }

    /// Documentation load-failure page
    pub fn docs_error(&self, source_url: &str) -> Result<String> {
        Ok(self.registry.render("docs_error", &json!({ "source_url": source_url }))?)
    }
}

/// Bytes as megabytes with one decimal, e.g. `12.3`
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}

/// en-US long date, e.g. `March 5, 2025`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::ReleaseAsset;
    use chrono::TimeZone;

    fn release(tag: &str, body: Option<&str>, assets: Vec<ReleaseAsset>) -> ReleaseRecord {
        ReleaseRecord {
            id: 1,
            tag_name: tag.to_string(),
            name: None,
            body: body.map(str::to_string),
            prerelease: false,
            published_at: Some(Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap()),
            html_url: format!("https://github.com/o/r/releases/tag/{tag}"),
            upload_url: None,
            assets,
        }
    }

    fn apk(name: &str, size: u64) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            size,
            browser_download_url: format!("https://github.com/o/r/releases/download/v1/{name}"),
        }
    }

    #[test]
    fn notes_are_escaped() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .releases(&[release(
                "v1",
                Some("<script>alert('x')</script> & <b>bold</b>"),
                vec![],
            )])
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp;"));
    }

    #[test]
    fn first_release_is_latest_and_missing_asset_links_to_page() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .releases(&[
                release("v2", None, vec![apk("app-v2.apk", 5 * 1024 * 1024)]),
                release("v1", None, vec![]),
            ])
            .unwrap();

        assert_eq!(html.matches("release-tag latest").count(), 1);
        assert!(html.find("v2").unwrap() < html.find("Latest").unwrap());
        assert!(html.contains("(5.0 MB)"));
        assert!(html.contains("View on GitHub"));
        assert!(html.contains("March 5, 2025"));
    }

    #[test]
    fn non_apk_assets_are_ignored() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .releases(&[release("v1", None, vec![apk("checksums.txt", 10)])])
            .unwrap();
        assert!(!html.contains("checksums.txt"));
        assert!(html.contains("View on GitHub"));
    }

    #[test]
    fn empty_listing_renders_placeholder() {
        let renderer = Renderer::new().unwrap();
        assert!(renderer.releases(&[]).unwrap().contains("No releases yet."));
        assert!(renderer.bucket(&[]).unwrap().contains("No releases yet."));

        let only_text = vec![BucketEntry {
            name: "readme.txt".to_string(),
            url: "https://x/readme.txt".to_string(),
            size: None,
            updated_at: None,
        }];
        assert!(renderer.bucket(&only_text).unwrap().contains("no-releases"));
    }

    #[test]
    fn bucket_size_only_when_known() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .bucket(&[BucketEntry {
                name: "app.apk".to_string(),
                url: "https://x/app.apk".to_string(),
                size: None,
                updated_at: None,
            }])
            .unwrap();
        assert!(html.contains("app.apk"));
        assert!(!html.contains("asset-size"));
    }

    #[test]
    fn error_placeholder_links_to_provider() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .error(&FallbackLink {
                url: "https://github.com/o/r/releases".to_string(),
                label: "View releases on GitHub".to_string(),
            })
            .unwrap();
        assert!(html.contains("Failed to load releases."));
        assert!(html.contains("https://github.com/o/r/releases"));
    }

    #[test]
    fn open_page_shows_exactly_one_state() {
        let renderer = Renderer::new().unwrap();
        let launching = renderer.open_page(false, "releases.html").unwrap();
        assert!(launching.contains(r#"id="loading-state" style="display: block""#));
        assert!(launching.contains(r#"id="fallback-state" style="display: none""#));

        let fallback = renderer.open_page(true, "releases.html").unwrap();
        assert!(fallback.contains(r#"id="loading-state" style="display: none""#));
        assert!(fallback.contains(r#"id="fallback-state" style="display: block""#));
    }

    #[test]
    fn megabytes_use_one_decimal() {
        assert_eq!(format_megabytes(0), "0.0");
        assert_eq!(format_megabytes(1536 * 1024), "1.5");
    }
}
