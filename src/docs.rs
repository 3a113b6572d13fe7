//! Documentation page rendering.
//!
//! Fetches a Markdown document (relative path or URL), converts it to HTML
//! and wraps it in the page fragment. A document that cannot be fetched
//! renders the error page with a link to the source instead.

use anyhow::Context;
use crate::error::Result;
use crate::render::Renderer;
use pulldown_cmark::{Options, Parser, html};
use std::path::PathBuf;
use std::time::Duration;

/// Default link shown when the documentation cannot be loaded
pub const DEFAULT_DOCS_SOURCE: &str = "https://github.com/sendilb191/people-tracker-app-mobile#readme";

/// Fetches and renders Markdown documentation
#[derive(Debug)]
pub struct DocsRenderer<'a> {
    renderer: &'a Renderer,
    base_dir: PathBuf,
    source_url: String,
    http: reqwest::Client,
}

impl<'a> DocsRenderer<'a> {
    /// Resolve relative paths against `base_dir`
    pub fn new(renderer: &'a Renderer, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("apk_release_publisher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            renderer,
            base_dir: base_dir.into(),
            source_url: DEFAULT_DOCS_SOURCE.to_string(),
            http,
        })
    }

    /// Override the "View on GitHub" fallback link
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    async fn fetch(&self, source: &str) -> Result<String> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let response = self.http.get(source).send().await?;
            let response = response.error_for_status()?;
            return Ok(response.text().await?);
        }

        let path = self.base_dir.join(source);
        let markdown = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(markdown)
    }

    /// Render `source` to a documentation page, or the error page if it
    /// cannot be fetched
    pub async fn render(&self, source: &str) -> Result<String> {
        match self.fetch(source).await {
            Ok(markdown) => self.renderer.docs_page(&markdown_to_html(&markdown)),
            Err(e) => {
                log::warn!("Could not load documentation '{source}': {e}");
                self.renderer.docs_error(&self.source_url)
            }
        }
    }
}

/// Convert GitHub-flavoured Markdown to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_tables_render() {
        let html = markdown_to_html("# Setup\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<h1>Setup</h1>"));
        assert!(html.contains("<table>"));
    }

    #[tokio::test]
    async fn local_document_is_rendered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("docs.md"), "## Install\n\nSideload the APK.").unwrap();

        let renderer = Renderer::new().unwrap();
        let docs = DocsRenderer::new(&renderer, dir.path()).unwrap();
        let page = docs.render("docs.md").await.unwrap();
        assert!(page.contains("<h2>Install</h2>"));
    }

    #[tokio::test]
    async fn missing_document_renders_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new().unwrap();
        let docs = DocsRenderer::new(&renderer, dir.path()).unwrap();

        let page = docs.render("missing.md").await.unwrap();
        assert!(page.contains("Error Loading Documentation"));
        assert!(page.contains("people-tracker-app-mobile"));
    }
}
