//! Object-storage backends.
//!
//! The publisher only needs five operations from a bucket: list, batch
//! remove, upload (optionally overwriting), derive a public URL and probe
//! connectivity. [`ObjectStore`] is the seam; [`SupabaseStorage`] talks to the
//! Supabase Storage REST API.

mod supabase;

pub use supabase::SupabaseStorage;

use crate::error::Result;
use crate::payload::Payload;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An object currently stored in the bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageObject {
    /// Object name (the uploaded file's original name)
    pub name: String,
    /// Size in bytes, when the backend reports it
    pub size: Option<u64>,
    /// Last modification time, when the backend reports it
    pub updated_at: Option<DateTime<Utc>>,
}

impl StorageObject {
    /// Object with a name only
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            updated_at: None,
        }
    }
}

/// Options for a single upload
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Overwrite an existing object with the same name
    pub upsert: bool,
    /// Content type override; the payload's own type is used when `None`
    pub content_type: Option<String>,
}

impl UploadOptions {
    /// Upload that overwrites any object with the same name
    pub fn overwrite() -> Self {
        Self {
            upsert: true,
            content_type: None,
        }
    }
}

/// Bucket-bound object-storage operations
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store operates on
    fn bucket(&self) -> &str;

    /// List every object in the bucket, in backend order
    async fn list(&self) -> Result<Vec<StorageObject>>;

    /// Remove the named objects in one batch call
    async fn remove(&self, names: &[String]) -> Result<()>;

    /// Upload `payload` under its original name
    async fn upload(&self, payload: &Payload, options: &UploadOptions) -> Result<()>;

    /// Public download address for `name` (no network call)
    fn public_url(&self, name: &str) -> String;

    /// Reach the backend and return the HTTP status it answered with
    async fn ping(&self) -> Result<u16>;
}
