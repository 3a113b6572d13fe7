//! Read path: fetch the published artifacts and render them.
//!
//! A listing always resolves to markup: the artifacts, the empty
//! placeholder, or the error placeholder with a link to the provider.

use crate::error::Result;
use crate::github::ReleaseRecord;
use crate::publish::Backend;
use crate::render::{BucketEntry, FallbackLink, Renderer};

/// What the provider currently reports
#[derive(Debug, Clone)]
pub enum Listing {
    /// Release records, newest first
    Releases(Vec<ReleaseRecord>),
    /// Bucket objects in backend order
    Objects(Vec<BucketEntry>),
    /// The provider could not be read
    Failed {
        /// Why loading failed (logged, not rendered)
        reason: String,
    },
}

impl Listing {
    /// Number of entries (0 for a failed listing)
    pub fn len(&self) -> usize {
        match self {
            Listing::Releases(releases) => releases.len(),
            Listing::Objects(objects) => objects.len(),
            Listing::Failed { .. } => 0,
        }
    }

    /// Whether nothing is published (or nothing could be read)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches and renders the listing for one backend
pub struct Catalog<'a> {
    backend: &'a Backend,
    renderer: &'a Renderer,
    fallback: FallbackLink,
}

impl<'a> Catalog<'a> {
    /// Catalog over `backend`, linking to `fallback` when loading fails
    pub fn new(backend: &'a Backend, renderer: &'a Renderer, fallback: FallbackLink) -> Self {
        Self {
            backend,
            renderer,
            fallback,
        }
    }

    /// Ask the backend what is currently published
    pub async fn fetch(&self) -> Listing {
        fetch_listing(self.backend).await
    }

    /// Render a fetched listing
    pub fn render(&self, listing: &Listing) -> Result<String> {
        match listing {
            Listing::Releases(releases) => self.renderer.releases(releases),
            Listing::Objects(entries) => self.renderer.bucket(entries),
            Listing::Failed { .. } => self.renderer.error(&self.fallback),
        }
    }

    /// Fetch and render in one step
    pub async fn render_current(&self) -> Result<String> {
        let listing = self.fetch().await;
        self.render(&listing)
    }
}

/// What `backend` currently publishes; provider failures become [`Listing::Failed`]
pub async fn fetch_listing(backend: &Backend) -> Listing {
    let result = match backend {
        Backend::ReleaseApi(client) => client.list_releases().await.map(Listing::Releases),
        Backend::Bucket { slot, .. } => slot.contents().await.map(|objects| {
            Listing::Objects(
                objects
                    .into_iter()
                    .map(|object| {
                        let url = slot.location_of(&object.name).url;
                        BucketEntry::from_object(object, url)
                    })
                    .collect(),
            )
        }),
    };

    result.unwrap_or_else(|e| {
        log::error!("Failed to fetch releases: {e}");
        Listing::Failed {
            reason: e.user_message(),
        }
    })
}
