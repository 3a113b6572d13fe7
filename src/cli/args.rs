//! Command line argument parsing and validation.
//!
//! Every backend setting can come from a flag or from the environment, so
//! the same `.env` used by the site works unchanged here.

use crate::config::{
    DEFAULT_BUCKET, DEFAULT_DEEP_LINK, DEFAULT_GITHUB_API, DEFAULT_GITHUB_REPO,
    DEFAULT_MAX_UPLOAD_MB,
};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Publish APK builds and render their download listings
#[derive(Parser, Debug)]
#[command(
    name = "apk_release_publisher",
    version,
    about = "Publish APK builds to a storage bucket or GitHub Releases",
    long_about = "Publish APK builds and render their download listings.

Usage:
  apk_release_publisher publish bucket app-release.apk
  apk_release_publisher publish github app-release.apk --tag v1.4.0 --name \"1.4.0\"
  apk_release_publisher list github --out releases-fragment.html
  apk_release_publisher launch
  apk_release_publisher verify"
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Show verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Which backend a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Single-APK object-storage bucket
    Bucket,
    /// GitHub Releases
    Github,
}

/// Object-storage connection settings
#[derive(ClapArgs, Debug, Clone)]
pub struct StorageArgs {
    /// Storage endpoint
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Public (anon) storage key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub anon_key: Option<String>,

    /// Bucket holding the published APK
    #[arg(long, env = "STORAGE_BUCKET", default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// Upload ceiling in megabytes
    #[arg(long, env = "APK_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: u64,
}

/// GitHub repository settings
#[derive(ClapArgs, Debug, Clone)]
pub struct GitHubArgs {
    /// Repository as owner/repo or GitHub URL
    #[arg(long, env = "GITHUB_REPO", default_value = DEFAULT_GITHUB_REPO)]
    pub repo: String,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API)]
    pub api_url: String,
}

/// Publish targets
#[derive(Subcommand, Debug)]
pub enum PublishTarget {
    /// Replace the bucket's APK with a new one
    Bucket {
        /// APK to publish
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        storage: StorageArgs,
    },

    /// Create a GitHub release and attach the APK
    Github {
        /// APK to publish
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Version tag, e.g. v1.4.0
        #[arg(long)]
        tag: String,

        /// Release title (defaults to the tag)
        #[arg(long, default_value = "")]
        name: String,

        /// Release notes
        #[arg(long, conflicts_with = "notes_file")]
        notes: Option<String>,

        /// Read release notes from a file
        #[arg(long)]
        notes_file: Option<PathBuf>,

        /// Mark as pre-release
        #[arg(long)]
        prerelease: bool,

        /// Token with repo scope (falls back to GITHUB_TOKEN, then the remembered token)
        #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Remember the token after a successful publish
        #[arg(long, conflicts_with = "forget_token")]
        remember_token: bool,

        /// Forget any remembered token after a successful publish
        #[arg(long)]
        forget_token: bool,

        #[command(flatten)]
        github: GitHubArgs,
    },
}

/// Remembered-token actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum TokenAction {
    /// Show the remembered token (masked)
    Show,
    /// Forget the remembered token
    Clear,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish an APK
    Publish {
        /// Backend to publish to
        #[command(subcommand)]
        target: PublishTarget,

        /// Skip re-listing after a successful publish
        #[arg(long)]
        no_refresh: bool,
    },

    /// Render the current download listing as HTML
    List {
        /// Backend to list
        #[arg(value_enum)]
        backend: BackendKind,

        #[command(flatten)]
        storage: StorageArgs,

        #[command(flatten)]
        github: GitHubArgs,

        /// Write the fragment to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Open the installed app through its deep link
    Launch {
        /// Custom-scheme URI
        #[arg(long, env = "DEEP_LINK_URI", default_value = DEFAULT_DEEP_LINK)]
        uri: String,

        /// Milliseconds to wait before showing the download fallback
        #[arg(long, default_value_t = 2500)]
        timeout_ms: u64,

        /// Fallback download address
        #[arg(long, default_value = "releases.html")]
        download_url: String,

        /// Also write the resulting open-page fragment to a file
        #[arg(long, value_name = "FILE")]
        page_out: Option<PathBuf>,
    },

    /// Render a Markdown document to an HTML page
    Docs {
        /// Relative path or URL of the Markdown document
        #[arg(default_value = "docs.md")]
        source: String,

        /// Directory relative paths are resolved against
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,

        /// Link shown when the document cannot be loaded
        #[arg(long)]
        source_url: Option<String>,

        /// Write the page to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Manage the remembered GitHub token
    Token {
        /// Action to perform
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Run the list/upload/delete/upload/verify sequence against the bucket
    Verify {
        #[command(flatten)]
        storage: StorageArgs,
    },
}

impl Command {
    /// Get command name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Publish { .. } => "publish",
            Command::List { .. } => "list",
            Command::Launch { .. } => "launch",
            Command::Docs { .. } => "docs",
            Command::Token { .. } => "token",
            Command::Verify { .. } => "verify",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Publish {
                target: PublishTarget::Github { tag, .. },
                ..
            } if tag.trim().is_empty() => {
                Err("--tag must not be empty".to_string())
            }
            Command::Publish {
                target: PublishTarget::Bucket { storage, .. },
                ..
            }
            | Command::Verify { storage }
                if storage.max_upload_mb == 0 =>
            {
                Err("--max-upload-mb must be greater than zero".to_string())
            }
            Command::Launch { timeout_ms: 0, .. } => {
                Err("--timeout-ms must be greater than zero".to_string())
            }
            Command::Launch { uri, .. } if !uri.contains(':') => {
                Err(format!("'{uri}' is not a URI (expected scheme://path)"))
            }
            _ => Ok(()),
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print progress message
    pub fn progress_println(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}
