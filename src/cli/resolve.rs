use std::sync::Arc;

use crate::{
    catalog::TargetCatalog,
    cli::context,
    info,
    matching::MatchOutcome,
    success,
    types::TrackDescriptor,
    warning,
};

pub async fn resolve(title: String, artists: Vec<String>) {
    let settings = context::settings();
    let target: Arc<dyn TargetCatalog> = Arc::new(context::plex(&settings).await);
    let resolver = context::resolver(target, &settings);

    let descriptor = TrackDescriptor {
        title,
        artists,
        source_id: String::new(),
        url: None,
    };

    let resolution = resolver.resolve_detailed(&descriptor).await;
    match resolution.outcome {
        MatchOutcome::Matched(track) => {
            success!(
                "'{}' by {} -> '{}' by '{}' (id {})",
                descriptor.title,
                descriptor.artists_display(),
                track.title,
                track.artist_name,
                track.id
            );
        }
        MatchOutcome::Unmatched => {
            warning!(
                "No match for '{}' by {}",
                descriptor.title,
                descriptor.artists_display()
            );
        }
    }
    info!("Resolution finished at stage {:?}", resolution.stage);
}
