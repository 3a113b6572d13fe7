//! Single-slot replacement.
//!
//! A release slot holds at most one published artifact. [`ReleaseSlot::replace`]
//! swaps whatever is there for a new payload and returns its public location.
//! [`BucketSlot`] implements it over any [`ObjectStore`] as list, batch delete,
//! then overwrite-upload, because plain object stores have no atomic
//! multi-object replace. A store that does can implement the trait directly.

use crate::error::Result;
use crate::payload::Payload;
use crate::storage::{ObjectStore, StorageObject, UploadOptions};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Publicly retrievable address of a published artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicLocation {
    /// Artifact name
    pub name: String,
    /// Download URL
    pub url: String,
}

/// Successful replacement, with any non-fatal problems met on the way
#[derive(Debug, Clone)]
pub struct Replacement {
    /// Where the new artifact can be downloaded
    pub location: PublicLocation,
    /// Objects the slot held before the replacement (when the listing worked)
    pub evicted: Vec<String>,
    /// Non-fatal warnings (listing or deletion failures)
    pub warnings: Vec<String>,
}

/// A storage location holding at most one published artifact
#[async_trait]
pub trait ReleaseSlot: Send + Sync {
    /// Replace the slot's contents with `payload`
    async fn replace(&self, payload: &Payload) -> Result<Replacement>;

    /// Current contents of the slot, in backend order
    async fn contents(&self) -> Result<Vec<StorageObject>>;

    /// Public download address for an artifact in the slot
    fn location_of(&self, name: &str) -> PublicLocation;
}

/// Delete-then-upload slot over an object-storage bucket
pub struct BucketSlot<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ObjectStore + ?Sized> BucketSlot<S> {
    /// Wrap a bucket-bound store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

#[async_trait]
impl<S: ObjectStore + ?Sized> ReleaseSlot for BucketSlot<S> {
    async fn replace(&self, payload: &Payload) -> Result<Replacement> {
        let mut warnings = Vec::new();
        let bucket = self.store.bucket().to_string();

        // Listing and deletion failures never abort the publish; the
        // overwrite-upload below still replaces a same-named object.
        let existing = match self.store.list().await {
            Ok(objects) => objects.into_iter().map(|o| o.name).collect::<Vec<_>>(),
            Err(e) => {
                log::warn!("Could not list '{bucket}' before upload: {e}");
                warnings.push(format!("Could not list existing files: {}", e.user_message()));
                Vec::new()
            }
        };

        if !existing.is_empty() {
            log::info!("Removing {} previous object(s) from '{bucket}'", existing.len());
            if let Err(e) = self.store.remove(&existing).await {
                log::warn!("Could not delete previous objects from '{bucket}': {e}");
                warnings.push(format!("Could not delete old files: {}", e.user_message()));
            }
        }

        self.store.upload(payload, &UploadOptions::overwrite()).await?;

        Ok(Replacement {
            location: self.location_of(payload.name()),
            evicted: existing,
            warnings,
        })
    }

    async fn contents(&self) -> Result<Vec<StorageObject>> {
        self.store.list().await
    }

    fn location_of(&self, name: &str) -> PublicLocation {
        PublicLocation {
            name: name.to_string(),
            url: self.store.public_url(name),
        }
    }
}
