use std::path::PathBuf;

use chrono::Local;

use crate::{SyncError, types::TrackDescriptor, utils};

pub const UNMATCHED_LOG_PREFIX: &str = "unmatched_tracks";

/// Writes the plain-text list of descriptors that could not be resolved.
pub struct UnmatchedLogManager {
    dir: PathBuf,
}

impl UnmatchedLogManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn write(
        &self,
        name: &str,
        descriptors: &[TrackDescriptor],
    ) -> Result<PathBuf, SyncError> {
        async_fs::create_dir_all(&self.dir).await?;

        let now = Local::now();
        let stem = format!(
            "{}_{}_{}",
            UNMATCHED_LOG_PREFIX,
            utils::sanitize_file_component(name),
            utils::file_timestamp(now)
        );
        let path = utils::unique_path(&self.dir, &stem, "txt");
        let content = render(name, &utils::log_timestamp(now), descriptors);
        async_fs::write(&path, content).await?;

        Ok(path)
    }
}

/// The log body: a header naming the playlist, then one block per descriptor.
pub fn render(name: &str, generated: &str, descriptors: &[TrackDescriptor]) -> String {
    let mut out = format!(
        "Unmatched tracks for playlist: {}\nGenerated: {}\n{}\n\n",
        name,
        generated,
        "-".repeat(50)
    );

    for descriptor in descriptors {
        out.push_str(&format!("Title: {}\n", descriptor.title));
        out.push_str(&format!("Artists: {}\n", descriptor.artists_display()));
        out.push_str(&format!(
            "Spotify URL: {}\n",
            descriptor.url.as_deref().unwrap_or("N/A")
        ));
        out.push('\n');
    }

    out
}
