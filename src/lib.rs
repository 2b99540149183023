//! Spotify to Plex Playlist Sync Library
//!
//! This library resolves tracks from a Spotify playlist into the closest matching
//! tracks of a Plex music library and reconciles the matches into a Plex playlist
//! of the same name. It includes the track-resolution engine, the sync orchestrator
//! that drives it across many playlists, and the catalog clients it talks to.
//!
//! # Modules
//!
//! - `assistant` - Optional text-completion client used to break ties
//! - `catalog` - Collaborator traits for the source, target and assistant
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading and the `Settings` value
//! - `error` - The crate error type
//! - `logging` - Verbose switch for the `debug!` macro
//! - `management` - Token cache, backups and unmatched-track logs
//! - `matching` - Normalization, scoring, candidate search and resolution
//! - `plex` - Plex Media Server client (target catalog)
//! - `retry` - Bounded retry with exponential backoff
//! - `spotify` - Spotify Web API client (source catalog)
//! - `sync` - Playlist reconciliation and the sync orchestrator
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use plexsync::{config, config::Settings};
//!
//! #[tokio::main]
//! async fn main() -> plexsync::Res<()> {
//!     config::load_env().await?;
//!     let settings = Settings::from_env()?;
//!     // Build the clients and run a sync...
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod matching;
pub mod plex;
pub mod retry;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

pub use error::SyncError;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI layer where errors from several sources meet and are only
/// reported to the user. Library code returns [`SyncError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Used for general information and status updates throughout the application.
///
/// # Example
///
/// ```rust,ignore
/// info!("Processing playlist: {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```rust,ignore
/// success!("Best match found: {} by {}", title, artist);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary uses this macro. Library code returns errors instead of
/// terminating the process.
///
/// # Example
///
/// ```rust,ignore
/// error!("Cannot load configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a search tier that failed or an assistant
/// reply that could not be parsed.
///
/// # Example
///
/// ```rust,ignore
/// warning!("Search failed for '{}': {}", query, e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when verbose output is enabled.
///
/// Candidate comparisons and normalized forms are logged through this macro.
/// Nothing is printed unless [`logging::set_verbose`] was switched on.
///
/// # Example
///
/// ```rust,ignore
/// debug!("Normalized title: '{}'", normalized);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::logging::is_verbose() {
      use colored::Colorize;
      println!("[{}] {}", ".".dimmed(), std::format!($($arg)*).dimmed());
    }
  })
}
