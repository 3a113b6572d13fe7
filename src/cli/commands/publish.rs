//! Publish command implementation.
//!
//! Replaces the bucket's APK, or creates a GitHub release with the APK
//! attached, then shows what the provider now lists.

use super::helpers::{bucket_backend, github_config, resolve_token, storage_client};
use crate::catalog::{Listing, fetch_listing};
use crate::cli::{PublishTarget, RuntimeConfig};
use crate::error::{GitHubError, Result};
use crate::github::GitHubReleaseClient;
use crate::payload::{self, Payload};
use crate::publish::{Backend, PublishOutcome, PublishRequest, Publisher, ReleaseMetadata};
use crate::render::format_megabytes;
use crate::token::TokenStore;

/// Execute publish command
pub(super) async fn execute_publish(
    target: &PublishTarget,
    no_refresh: bool,
    config: &RuntimeConfig,
) -> Result<i32> {
    match target {
        PublishTarget::Bucket { file, storage } => {
            let store = storage_client(storage)?;
            let limit = store.config().max_upload_bytes;
            let selection = payload::select(file.as_deref(), Some(limit)).await?;
            warn_unless_apk(selection.as_ref(), config);

            config.progress_println("Replacing the published APK...");
            let publisher = Publisher::new(bucket_backend(store));
            let outcome = publisher.publish(PublishRequest::new(selection)).await?;
            report_outcome(&outcome, config);

            if !no_refresh {
                refresh(publisher.backend(), config).await;
            }
            Ok(0)
        }
        PublishTarget::Github {
            file,
            tag,
            name,
            notes,
            notes_file,
            prerelease,
            token,
            remember_token,
            forget_token,
            github,
        } => {
            let selection = payload::select(file.as_deref(), None).await?;
            warn_unless_apk(selection.as_ref(), config);

            let store = TokenStore::default_location()
                .inspect_err(|e| log::warn!("Token store unavailable: {e}"))
                .ok();
            let previously_remembered = store.as_ref().and_then(TokenStore::remembered).is_some();
            let token = resolve_token(token.as_deref(), store.as_ref()).ok_or(GitHubError::MissingToken)?;

            let notes = match (notes, notes_file) {
                (Some(notes), _) => notes.clone(),
                (None, Some(path)) => tokio::fs::read_to_string(path).await?,
                (None, None) => String::new(),
            };
            let metadata = ReleaseMetadata {
                tag: tag.clone(),
                name: name.clone(),
                notes,
                prerelease: *prerelease,
            };

            let client = GitHubReleaseClient::new(github_config(github, Some(token.clone()))?)?;
            let publisher = Publisher::new(Backend::ReleaseApi(client));

            config.progress_println("Creating release...");
            let outcome = publisher
                .publish(PublishRequest::new(selection).with_metadata(metadata))
                .await?;
            config.success_println(&format!("Release {} created successfully!", tag.trim()));
            report_outcome(&outcome, config);

            // Remembering follows the previous choice unless a flag overrides it.
            let remember = *remember_token || (previously_remembered && !*forget_token);
            if let Some(store) = &store {
                match store.save(&token, remember) {
                    Ok(()) if remember => {
                        config.verbose_println(&format!("Token remembered in {}", store.path().display()));
                    }
                    Ok(()) => {}
                    Err(e) => config.warning_println(&format!("Could not update the remembered token: {e}")),
                }
            }

            if !no_refresh {
                refresh(publisher.backend(), config).await;
            }
            Ok(0)
        }
    }
}

fn warn_unless_apk(selection: Option<&Payload>, config: &RuntimeConfig) {
    if let Some(payload) = selection.filter(|p| !p.is_apk()) {
        config.warning_println(&format!("{} does not look like an APK", payload.name()));
    }
}

fn report_outcome(outcome: &PublishOutcome, config: &RuntimeConfig) {
    for warning in &outcome.warnings {
        config.warning_println(warning);
    }
    if !outcome.replaced.is_empty() {
        config.verbose_println(&format!("Replaced {}", outcome.replaced.join(", ")));
    }
    config.success_println(&format!("Published {}", outcome.location.name));
    let _ = config.output().link("Download", &outcome.location.url);
    config.indent(&format!("Size: {} MB", format_megabytes(outcome.size)));
    config.indent(&format!("SHA-256: {}", outcome.sha256));
    if let Some(release) = &outcome.release {
        let _ = config.output().link("Release page", &release.html_url);
    }
}

async fn refresh(backend: &Backend, config: &RuntimeConfig) {
    match fetch_listing(backend).await {
        Listing::Failed { reason } => {
            config.warning_println(&format!("Could not refresh the listing: {reason}"));
        }
        listing if listing.is_empty() => config.println("No releases yet."),
        Listing::Objects(objects) => {
            config.println(&format!("Bucket now holds {} object(s):", objects.len()));
            for object in &objects {
                config.indent(&object.name);
            }
        }
        Listing::Releases(releases) => {
            config.println(&format!("{} release(s) published:", releases.len()));
            for (index, release) in releases.iter().enumerate() {
                let latest = if index == 0 { " (latest)" } else { "" };
                config.indent(&format!("{}{latest}", release.display_name()));
            }
        }
    }
}
