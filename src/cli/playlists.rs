use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{catalog::SourceCatalog, cli::context, error, types::PlaylistTableRow, warning};

pub async fn playlists(search: Option<String>) {
    let settings = context::settings();
    let source = context::spotify(&settings).await;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching Spotify playlists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut playlists = match source.fetch_playlists().await {
        Ok(playlists) => {
            pb.finish_and_clear();
            playlists
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot fetch playlists from Spotify. Err: {}", e);
        }
    };

    // made for you first, otherwise keep Spotify's order
    playlists.sort_by_key(|p| !p.made_for_you);

    if let Some(search) = search {
        let search_term = search.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&search_term));
    }

    if playlists.is_empty() {
        warning!("No playlists found");
        return;
    }

    let table_rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            tracks: p.track_count.map(|c| c.to_string()).unwrap_or_default(),
            kind: if p.made_for_you {
                "Made For You".to_string()
            } else {
                "Playlist".to_string()
            },
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
