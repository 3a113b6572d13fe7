//! Candidate binary payloads.
//!
//! A payload is the selected APK: its original file name, its bytes and the
//! content type sent with every upload.

use crate::config::{APK_CONTENT_TYPE, APK_SUFFIX};
use crate::error::{Result, ValidationError};
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::path::Path;

/// A selected binary ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    name: String,
    bytes: Bytes,
    content_type: String,
}

impl Payload {
    /// Create a payload from in-memory bytes
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            content_type: APK_CONTENT_TYPE.to_string(),
        }
    }

    /// Read a payload from disk, keeping the original file name
    ///
    /// With a `limit`, the file size is checked from its metadata before
    /// any byte is read.
    pub async fn from_path(path: &Path, limit: Option<u64>) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ValidationError::InvalidFileName {
                path: path.display().to_string(),
            })?
            .to_string();

        if let Some(limit) = limit {
            let size = tokio::fs::metadata(path).await?.len();
            if size > limit {
                return Err(ValidationError::PayloadTooLarge { name, size, limit }.into());
            }
        }

        let bytes = tokio::fs::read(path).await?;
        log::debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::new(name, bytes))
    }

    /// Original file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw payload bytes
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Content type sent with the upload
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Payload size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the file name carries the APK suffix
    pub fn is_apk(&self) -> bool {
        has_apk_suffix(&self.name)
    }

    /// Hex-encoded SHA-256 of the payload
    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    /// Reject payloads above `limit` bytes
    pub fn ensure_within(&self, limit: u64) -> Result<()> {
        if self.size() > limit {
            return Err(ValidationError::PayloadTooLarge {
                name: self.name.clone(),
                size: self.size(),
                limit,
            }
            .into());
        }
        Ok(())
    }
}

/// Turn an optional selection into a payload, rejecting an empty selection
pub fn require_selection(selection: Option<Payload>) -> Result<Payload> {
    selection.ok_or_else(|| ValidationError::NoPayloadSelected.into())
}

/// Load the payload at `path`, if one was selected, refusing files above `limit`
pub async fn select(path: Option<&Path>, limit: Option<u64>) -> Result<Option<Payload>> {
    match path {
        Some(path) => Ok(Some(Payload::from_path(path, limit).await?)),
        None => Ok(None),
    }
}

/// Case-insensitive check for the `.apk` suffix
pub fn has_apk_suffix(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(APK_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use std::io::Write;

    #[test]
    fn suffix_check_ignores_case() {
        assert!(has_apk_suffix("app-release.APK"));
        assert!(has_apk_suffix("a.apk"));
        assert!(!has_apk_suffix("a.apk.zip"));
        assert!(!has_apk_suffix("notes.txt"));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = require_selection(None).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Validation(ValidationError::NoPayloadSelected)
        ));
    }

    #[test]
    fn ceiling_is_inclusive() {
        let payload = Payload::new("a.apk", vec![0u8; 10]);
        assert!(payload.ensure_within(10).is_ok());
        assert!(matches!(
            payload.ensure_within(9),
            Err(ReleaseError::Validation(ValidationError::PayloadTooLarge { size: 10, limit: 9, .. }))
        ));
    }

    #[test]
    fn sha256_of_known_input() {
        let payload = Payload::new("a.apk", &b"abc"[..]);
        assert_eq!(
            payload.sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn reads_file_with_original_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people-tracker-1.2.0.apk");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"PK\x03\x04").unwrap();

        let payload = select(Some(&path), Some(4)).await.unwrap().unwrap();
        assert_eq!(payload.name(), "people-tracker-1.2.0.apk");
        assert_eq!(payload.size(), 4);
        assert_eq!(payload.content_type(), APK_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn no_path_means_no_selection() {
        assert!(select(None, Some(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn oversize_file_is_rejected_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.apk");
        // sparse: 8 GiB on paper, nothing allocated
        std::fs::File::create(&path)
            .unwrap()
            .set_len(8 * 1024 * 1024 * 1024)
            .unwrap();

        let err = select(Some(&path), Some(1024)).await.unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Validation(ValidationError::PayloadTooLarge {
                size: 8589934592,
                limit: 1024,
                ..
            })
        ));
    }
}
