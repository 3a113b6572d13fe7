//! Error types for publish, listing and launch operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use thiserror::Error;

/// Result type alias for apk_release_publisher operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all apk_release_publisher operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Payload validation errors (caught before any network call)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Object-storage backend errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// GitHub release API errors
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// Publisher workflow errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Template registration errors
    #[error("Template registration error: {0}")]
    TemplateRegistration(#[from] Box<handlebars::TemplateError>),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Payload validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// No file was selected for publishing
    #[error("Please select an APK file")]
    NoPayloadSelected,

    /// Payload exceeds the configured upload ceiling
    #[error("File '{name}' is {size} bytes, which exceeds the {limit} byte upload limit")]
    PayloadTooLarge {
        /// File name
        name: String,
        /// Payload size in bytes
        size: u64,
        /// Configured ceiling in bytes
        limit: u64,
    },

    /// Payload path has no usable file name
    #[error("Cannot derive a file name from '{path}'")]
    InvalidFileName {
        /// Offending path
        path: String,
    },

    /// A release tag is required for the release API variant
    #[error("A version tag is required to create a release")]
    MissingTag,
}

/// Object-storage backend errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Listing the bucket failed
    #[error("Failed to list bucket '{bucket}': {message}")]
    ListFailed {
        /// Bucket name
        bucket: String,
        /// Provider message
        message: String,
    },

    /// Batch removal failed
    #[error("Failed to delete {count} object(s) from '{bucket}': {message}")]
    RemoveFailed {
        /// Bucket name
        bucket: String,
        /// Number of objects requested for removal
        count: usize,
        /// Provider message
        message: String,
    },

    /// Upload failed
    #[error("{message}")]
    UploadFailed {
        /// Object name
        name: String,
        /// Provider message, surfaced verbatim
        message: String,
    },

    /// Backend could not be reached
    #[error("Cannot reach storage backend at {endpoint}: {reason}")]
    Unreachable {
        /// Endpoint that was probed
        endpoint: String,
        /// Reason for the failure
        reason: String,
    },
}

/// GitHub release API errors
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Creating the release record failed
    #[error("{message}")]
    CreateFailed {
        /// HTTP status code
        status: u16,
        /// Provider message, surfaced verbatim
        message: String,
    },

    /// Uploading the attachment failed (release record already exists)
    #[error("{message}")]
    AssetUploadFailed {
        /// Tag of the orphaned release record
        tag: String,
        /// HTTP status code
        status: u16,
        /// Provider message, surfaced verbatim
        message: String,
    },

    /// Listing releases failed
    #[error("GitHub API returned {status}")]
    ListFailed {
        /// HTTP status code
        status: u16,
    },

    /// A token is required for authenticated calls
    #[error("GitHub token not provided")]
    MissingToken,
}

/// Publisher workflow errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// A publish is already running on this publisher
    #[error("A publish operation is already in progress")]
    AlreadyInProgress,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable or flag is missing
    #[error("Missing required setting: {name}")]
    Missing {
        /// Setting name (environment variable)
        name: String,
    },

    /// Setting present but malformed
    #[error("Invalid value for {name}: {reason}")]
    Invalid {
        /// Setting name
        name: String,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl From<handlebars::TemplateError> for ReleaseError {
    fn from(error: handlebars::TemplateError) -> Self {
        ReleaseError::TemplateRegistration(Box::new(error))
    }
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Validation(ValidationError::NoPayloadSelected) => vec![
                "Pass the path of the APK to publish".to_string(),
            ],
            ReleaseError::Validation(ValidationError::PayloadTooLarge { limit, .. }) => vec![
                format!(
                    "Shrink the APK below {} MB (enable minification or split ABIs)",
                    limit / (1024 * 1024)
                ),
                "Raise APK_MAX_UPLOAD_MB only if the backend limit was raised too".to_string(),
            ],
            ReleaseError::Config(ConfigError::Missing { name }) => vec![
                format!("Export {name} or pass the matching command line flag"),
            ],
            ReleaseError::GitHub(GitHubError::MissingToken) => vec![
                "Set GH_TOKEN or GITHUB_TOKEN, or pass --token".to_string(),
                "Use --remember-token once to store it for later runs".to_string(),
            ],
            ReleaseError::GitHub(GitHubError::CreateFailed { status: 401, .. })
            | ReleaseError::GitHub(GitHubError::CreateFailed { status: 403, .. }) => vec![
                "Verify the token is valid and has the 'repo' scope".to_string(),
            ],
            ReleaseError::GitHub(GitHubError::CreateFailed { status: 422, .. }) => vec![
                "A release with this tag probably exists already; choose a new version tag"
                    .to_string(),
            ],
            ReleaseError::GitHub(GitHubError::AssetUploadFailed { tag, .. }) => vec![
                format!("Release {tag} was created without its APK"),
                "Attach the APK through the GitHub release page or delete the release and retry"
                    .to_string(),
            ],
            ReleaseError::Storage(StorageError::Unreachable { .. }) => vec![
                "Check SUPABASE_URL and your network connection".to_string(),
            ],
            ReleaseError::Publish(PublishError::AlreadyInProgress) => vec![
                "Wait for the running publish to finish".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable by simply re-triggering the operation
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ReleaseError::Validation(_)
                | ReleaseError::Config(_)
                | ReleaseError::GitHub(GitHubError::MissingToken)
        )
    }

    /// Message suitable for showing to the end user verbatim
    pub fn user_message(&self) -> String {
        match self {
            ReleaseError::Validation(e) => e.to_string(),
            ReleaseError::Storage(e) => e.to_string(),
            ReleaseError::GitHub(e) => e.to_string(),
            ReleaseError::Publish(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_messages_surface_verbatim() {
        let err = ReleaseError::from(GitHubError::CreateFailed {
            status: 422,
            message: "Validation Failed".to_string(),
        });
        assert_eq!(err.user_message(), "Validation Failed");
    }

    #[test]
    fn validation_errors_are_not_recoverable() {
        let err = ReleaseError::from(ValidationError::NoPayloadSelected);
        assert!(!err.is_recoverable());
        assert_eq!(err.user_message(), "Please select an APK file");

        let upload = ReleaseError::from(StorageError::UploadFailed {
            name: "a.apk".to_string(),
            message: "Payload too large".to_string(),
        });
        assert!(upload.is_recoverable());
    }

    #[test]
    fn oversize_suggestion_mentions_limit() {
        let err = ReleaseError::from(ValidationError::PayloadTooLarge {
            name: "big.apk".to_string(),
            size: 200 * 1024 * 1024,
            limit: 100 * 1024 * 1024,
        });
        assert!(err.recovery_suggestions()[0].contains("100 MB"));
    }
}
