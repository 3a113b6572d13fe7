//! Single-slot release publishing.
//!
//! This module provides the write path for both backends: replacing the
//! bucket's single APK, or creating a GitHub release and attaching the APK.

mod publisher;

pub use publisher::{Backend, PublishOutcome, PublishRequest, Publisher, ReleaseMetadata};
