//! yt-dlp wrapper for searching and downloading track audio.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Search query for a track: name plus artist, as a human would type it.
pub fn search_query(track_name: &str, artist_name: &str) -> String {
    format!("{} {}", track_name, artist_name)
}

/// Argument list for one search-and-download invocation.
///
/// `ytsearch1:` takes the first search result; audio is extracted to WAV so
/// every download lands in the same container regardless of source format.
pub fn yt_dlp_args(query: &str, output_template: &str) -> Vec<String> {
    vec![
        "--no-progress".to_string(),
        "--newline".to_string(),
        "-x".to_string(),
        "--audio-format".to_string(),
        "wav".to_string(),
        "-o".to_string(),
        output_template.to_string(),
        format!("ytsearch1:{}", query),
    ]
}

/// Download the best search match for a track, written under its numeric id.
pub async fn download_track(
    yt_dlp: &Path,
    query: &str,
    output_dir: &Path,
    track_id: u64,
) -> Result<PathBuf> {
    let output_template = format!("{}/{}.%(ext)s", output_dir.display(), track_id);

    info!("Searching and downloading: {}", query);

    let mut cmd = Command::new(yt_dlp);
    cmd.args(yt_dlp_args(query, &output_template))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().context("Failed to spawn yt-dlp")?;

    // Read output for logging
    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        let mut lines = reader.lines();

        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("yt-dlp: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let reader = BufReader::new(stderr);
        let mut lines = reader.lines();

        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("yt-dlp stderr: {}", line);
            }
        });
    }

    let status = child.wait().await.context("Failed to wait for yt-dlp")?;

    if !status.success() {
        anyhow::bail!("yt-dlp exited with status: {:?}", status.code());
    }

    let downloaded = output_dir.join(format!("{}.wav", track_id));
    if !downloaded.exists() {
        anyhow::bail!("yt-dlp produced no file for track {}", track_id);
    }

    Ok(downloaded)
}
