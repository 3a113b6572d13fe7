//! The publisher and its backends

use crate::error::{PublishError, Result, ValidationError};
use crate::github::{GitHubReleaseClient, ReleaseDraft, ReleaseRecord};
use crate::payload::{Payload, require_selection};
use crate::slot::{PublicLocation, ReleaseSlot};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where published artifacts live
#[derive(Clone)]
pub enum Backend {
    /// Single-APK bucket, replaced on every publish
    Bucket {
        /// Slot implementation (delete-then-upload for plain object stores)
        slot: Arc<dyn ReleaseSlot>,
        /// Payload ceiling in bytes, enforced before any network call
        max_upload_bytes: u64,
    },
    /// GitHub release records with the APK attached
    ReleaseApi(GitHubReleaseClient),
}

impl Backend {
    /// Short name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Bucket { .. } => "bucket",
            Backend::ReleaseApi(_) => "github",
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Bucket {
                max_upload_bytes, ..
            } => f
                .debug_struct("Bucket")
                .field("max_upload_bytes", max_upload_bytes)
                .finish_non_exhaustive(),
            Backend::ReleaseApi(client) => f.debug_tuple("ReleaseApi").field(client).finish(),
        }
    }
}

/// Release metadata for the release API backend
#[derive(Debug, Clone, Default)]
pub struct ReleaseMetadata {
    /// Version tag, e.g. `v1.4.0`
    pub tag: String,
    /// Display name; the tag is used when empty
    pub name: String,
    /// Free-text release notes
    pub notes: String,
    /// Pre-release flag
    pub prerelease: bool,
}

impl ReleaseMetadata {
    fn to_draft(&self) -> Result<ReleaseDraft> {
        let tag = self.tag.trim();
        if tag.is_empty() {
            return Err(ValidationError::MissingTag.into());
        }
        Ok(ReleaseDraft {
            tag_name: tag.to_string(),
            name: match self.name.trim() {
                "" => tag.to_string(),
                name => name.to_string(),
            },
            body: self.notes.clone(),
            prerelease: self.prerelease,
        })
    }
}

/// One publish invocation
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    /// The selected payload, if any
    pub selection: Option<Payload>,
    /// Release metadata (ignored by the bucket backend)
    pub metadata: ReleaseMetadata,
}

impl PublishRequest {
    /// Request for `selection` without release metadata
    pub fn new(selection: Option<Payload>) -> Self {
        Self {
            selection,
            metadata: ReleaseMetadata::default(),
        }
    }

    /// Attach release metadata
    pub fn with_metadata(mut self, metadata: ReleaseMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Result of a successful publish
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Public download location of the new artifact
    pub location: PublicLocation,
    /// Non-fatal problems (listing/deletion failures in the bucket backend)
    pub warnings: Vec<String>,
    /// Objects the bucket held before this publish (empty for the release API)
    pub replaced: Vec<String>,
    /// Release record created by the release API backend
    pub release: Option<ReleaseRecord>,
    /// Published size in bytes
    pub size: u64,
    /// Hex SHA-256 of the published payload
    pub sha256: String,
}

/// Single-Slot Release Publisher
///
/// Only one publish runs per publisher at a time; a second call made while
/// one is in flight fails with [`PublishError::AlreadyInProgress`]. Nothing
/// coordinates separate publishers or clients: the last writer wins.
#[derive(Debug)]
pub struct Publisher {
    backend: Backend,
    in_flight: AtomicBool,
}

/// Marks a publish as running until dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PublishError::AlreadyInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Publisher {
    /// Create a publisher for `backend`
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Backend this publisher writes to
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Whether a publish is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Publish the selected payload
    ///
    /// Validation (selection, size ceiling, tag) happens before any network
    /// call. The second backend step never starts before the first resolves.
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishOutcome> {
        let payload = require_selection(request.selection)?;
        let _guard = InFlight::acquire(&self.in_flight)?;

        match &self.backend {
            Backend::Bucket {
                slot,
                max_upload_bytes,
            } => {
                payload.ensure_within(*max_upload_bytes)?;
                log::info!("Publishing {} to bucket", payload.name());

                let replacement = slot.replace(&payload).await?;
                Ok(PublishOutcome {
                    location: replacement.location,
                    warnings: replacement.warnings,
                    replaced: replacement.evicted,
                    release: None,
                    size: payload.size(),
                    sha256: payload.sha256(),
                })
            }
            Backend::ReleaseApi(client) => {
                let draft = request.metadata.to_draft()?;
                log::info!("Publishing {} as release {}", payload.name(), draft.tag_name);

                let release = client.create_release(&draft).await?;
                let asset = client.upload_asset(&release, &payload).await?;
                Ok(PublishOutcome {
                    location: PublicLocation {
                        name: asset.name,
                        url: asset.browser_download_url,
                    },
                    warnings: Vec::new(),
                    replaced: Vec::new(),
                    release: Some(release),
                    size: payload.size(),
                    sha256: payload.sha256(),
                })
            }
        }
    }
}
