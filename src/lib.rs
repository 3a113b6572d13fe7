//! # APK Release Publisher
//!
//! Publish Android APK builds and render their download listings.
//!
//! Two backends are supported:
//!
//! - **Bucket**: an object-storage bucket holding exactly one APK. Publishing
//!   lists the bucket, deletes everything in it, then uploads the new file
//!   with overwrite semantics.
//! - **Release API**: GitHub Releases. Publishing creates a release and
//!   attaches the APK to it as a binary asset.
//!
//! The read path renders the current listing as an HTML fragment (or an
//! empty/error placeholder), and the launcher hands a deep-link URI to the
//! installed app with a timed download fallback.
//!
//! ## Usage
//!
//! ```bash
//! apk_release_publisher publish bucket app-release.apk
//! apk_release_publisher publish github app-release.apk --tag v1.4.0
//! apk_release_publisher list github --out fragment.html
//! apk_release_publisher launch --uri peopletracker://open
//! apk_release_publisher verify
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod github;
pub mod launcher;
pub mod payload;
pub mod publish;
pub mod render;
pub mod slot;
pub mod storage;
pub mod token;
pub mod verify;

pub use catalog::{Catalog, Listing};
pub use cli::Args;
pub use config::{GitHubConfig, LauncherConfig, StorageConfig};
pub use error::{ReleaseError, Result};
pub use github::{GitHubReleaseClient, ReleaseRecord};
pub use launcher::{LaunchState, Launcher};
pub use payload::Payload;
pub use publish::{Backend, PublishOutcome, PublishRequest, Publisher, ReleaseMetadata};
pub use render::Renderer;
pub use slot::{BucketSlot, ReleaseSlot};
pub use storage::{ObjectStore, SupabaseStorage};
