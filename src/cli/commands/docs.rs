//! Docs command: render a Markdown document to a page.

use super::helpers::emit_html;
use crate::cli::RuntimeConfig;
use crate::docs::DocsRenderer;
use crate::error::Result;
use crate::render::Renderer;
use std::path::Path;

/// Execute docs command
pub(super) async fn execute_docs(
    source: &str,
    base_dir: &Path,
    source_url: Option<&str>,
    out: Option<&Path>,
    config: &RuntimeConfig,
) -> Result<i32> {
    let renderer = Renderer::new()?;
    let mut docs = DocsRenderer::new(&renderer, base_dir)?;
    if let Some(url) = source_url {
        docs = docs.with_source_url(url);
    }

    config.verbose_println(&format!("Rendering {source}"));
    let html = docs.render(source).await?;
    emit_html(config, out, &html).await?;
    Ok(0)
}
