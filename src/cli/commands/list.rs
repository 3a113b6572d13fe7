//! List command: render the current download listing.

use super::helpers::{
    bucket_backend, bucket_fallback, emit_html, github_config, releases_fallback, storage_client,
};
use crate::catalog::Catalog;
use crate::cli::{BackendKind, GitHubArgs, RuntimeConfig, StorageArgs};
use crate::error::Result;
use crate::github::GitHubReleaseClient;
use crate::publish::Backend;
use crate::render::Renderer;
use std::path::Path;

/// Execute list command
///
/// A provider failure still renders (the error placeholder) and exits 0;
/// only local failures such as an unwritable output file are errors.
pub(super) async fn execute_list(
    backend: BackendKind,
    storage: &StorageArgs,
    github: &GitHubArgs,
    out: Option<&Path>,
    config: &RuntimeConfig,
) -> Result<i32> {
    let (backend, fallback) = match backend {
        BackendKind::Bucket => (bucket_backend(storage_client(storage)?), bucket_fallback(github)?),
        BackendKind::Github => {
            let github = github_config(github, None)?;
            let fallback = releases_fallback(&github);
            (Backend::ReleaseApi(GitHubReleaseClient::new(github)?), fallback)
        }
    };

    config.verbose_println(&format!("Listing {} releases", backend.name()));
    let renderer = Renderer::new()?;
    let catalog = Catalog::new(&backend, &renderer, fallback);

    let listing = catalog.fetch().await;
    config.verbose_println(&format!("{} entr(ies) found", listing.len()));
    let html = catalog.render(&listing)?;
    emit_html(config, out, &html).await?;
    Ok(0)
}
