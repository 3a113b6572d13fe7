//! GitHub integration for release publishing and listing

mod release_client;
mod types;

pub use release_client::GitHubReleaseClient;
pub use types::{ReleaseAsset, ReleaseDraft, ReleaseRecord};
