//! # CLI Module
//!
//! The command-line layer of plexsync. Each command loads the [`Settings`]
//! once, builds the catalog clients it needs and hands them to the library:
//!
//! - [`playlists`] - lists the Spotify playlists that can be synced
//! - [`sync`] - syncs selected playlists into Plex with a live progress bar
//! - [`resolve`] - resolves a single title/artist pair, for diagnosing matches
//!
//! ## Usage
//!
//! ```bash
//! plexsync playlists --search mix
//! plexsync sync --playlist "Discover Weekly" --playlist "Road Trip"
//! plexsync sync --all --keep-going
//! plexsync resolve --title "T.N.T" --artist "AC/DC" --verbose
//! ```
//!
//! Commands report through the crate's logging macros and terminate through
//! `error!` on fatal failures; the library underneath only returns errors.
//!
//! [`Settings`]: crate::config::Settings

mod context;
mod playlists;
mod resolve;
mod sync;

pub use playlists::playlists;
pub use resolve::resolve;
pub use sync::{SyncOptions, sync};
