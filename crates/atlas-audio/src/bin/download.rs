use anyhow::Context;
use atlas_audio::download;
use atlas_core::config::Config;
use atlas_core::{platform, records};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    atlas_core::logging::init();

    let config = Config::load()?;
    let yt_dlp = platform::find_yt_dlp()
        .context("yt-dlp not found; install it on PATH or set YT_DLP_PATH")?;

    let tracks = records::read_tracks(&config.paths.metadata_csv).with_context(|| {
        format!(
            "failed to read metadata from {}",
            config.paths.metadata_csv.display()
        )
    })?;

    std::fs::create_dir_all(&config.paths.downloads_dir)?;

    let mut downloaded = 0usize;
    for track in &tracks {
        let query = download::search_query(&track.track_name, &track.artist_name);
        match download::download_track(&yt_dlp, &query, &config.paths.downloads_dir, track.track_id)
            .await
        {
            Ok(path) => {
                downloaded += 1;
                info!(
                    "Downloaded {:?} by {:?} as {}",
                    track.track_name,
                    track.artist_name,
                    path.display()
                );
            }
            Err(e) => error!(
                "Failed to download {:?} by {:?}: {:#}",
                track.track_name, track.artist_name, e
            ),
        }
    }

    info!("Downloaded {} of {} tracks", downloaded, tracks.len());
    Ok(())
}
