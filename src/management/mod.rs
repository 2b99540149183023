mod auth;
mod backup;
mod unmatched;

pub use auth::{TokenManager, refreshed_token};
pub use backup::{BackupManager, SOURCE_BACKUP_PREFIX, TARGET_BACKUP_PREFIX};
pub use unmatched::{UNMATCHED_LOG_PREFIX, UnmatchedLogManager, render as render_unmatched_log};
