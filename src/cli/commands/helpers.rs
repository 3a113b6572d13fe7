//! Shared helper functions for command execution.

use crate::cli::{GitHubArgs, RuntimeConfig, StorageArgs};
use crate::config::{GitHubConfig, StorageConfig};
use crate::error::{ConfigError, Result};
use crate::publish::Backend;
use crate::render::FallbackLink;
use crate::slot::BucketSlot;
use crate::storage::SupabaseStorage;
use crate::token::TokenStore;
use std::path::Path;
use std::sync::Arc;

/// Build the storage configuration, requiring endpoint and key
pub(super) fn storage_config(args: &StorageArgs) -> Result<StorageConfig> {
    let endpoint = args
        .supabase_url
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing {
            name: "SUPABASE_URL".to_string(),
        })?;
    let anon_key = args
        .anon_key
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing {
            name: "SUPABASE_ANON_KEY".to_string(),
        })?;

    StorageConfig::new(endpoint, args.bucket.clone(), anon_key)?.with_max_upload_mb(args.max_upload_mb)
}

/// Storage client for the configured bucket
pub(super) fn storage_client(args: &StorageArgs) -> Result<Arc<SupabaseStorage>> {
    Ok(Arc::new(SupabaseStorage::new(storage_config(args)?)?))
}

/// Bucket backend with a delete-then-upload slot
pub(super) fn bucket_backend(store: Arc<SupabaseStorage>) -> Backend {
    let max_upload_bytes = store.config().max_upload_bytes;
    Backend::Bucket {
        slot: Arc::new(BucketSlot::new(store)),
        max_upload_bytes,
    }
}

/// GitHub configuration with an optional token
pub(super) fn github_config(args: &GitHubArgs, token: Option<String>) -> Result<GitHubConfig> {
    Ok(GitHubConfig::new(&args.repo, &args.api_url)?.with_token(token))
}

/// Link to the provider's own release listing
pub(super) fn releases_fallback(github: &GitHubConfig) -> FallbackLink {
    FallbackLink {
        url: github.releases_page(),
        label: "View releases on GitHub".to_string(),
    }
}

/// Fallback for bucket listings, which have no provider page of their own
pub(super) fn bucket_fallback(github: &GitHubArgs) -> Result<FallbackLink> {
    Ok(releases_fallback(&github_config(github, None)?))
}

/// Token from the flag/`GH_TOKEN`, then `GITHUB_TOKEN`, then the token store
pub(super) fn resolve_token(flag: Option<&str>, store: Option<&TokenStore>) -> Option<String> {
    if let Some(token) = flag.filter(|t| !t.trim().is_empty()) {
        return Some(token.to_string());
    }
    if let Ok(token) = std::env::var("GITHUB_TOKEN")
        && !token.trim().is_empty()
    {
        return Some(token);
    }
    store.and_then(TokenStore::remembered)
}

/// Write `html` to `out`, or print it to stdout
pub(super) async fn emit_html(config: &RuntimeConfig, out: Option<&Path>, html: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, html).await?;
            config.success_println(&format!("Wrote {}", path.display()));
        }
        None => config.output().fragment(html)?,
    }
    Ok(())
}
