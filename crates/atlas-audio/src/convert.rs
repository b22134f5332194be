//! ffmpeg wrapper for normalizing downloaded audio.

use std::path::Path;

use anyhow::{Context, Result};
use atlas_core::config::ConvertConfig;
use tokio::process::Command;
use tracing::info;

/// Argument list for one re-encode: fixed codec, sample rate, and channel
/// layout, overwriting any previous output.
pub fn ffmpeg_args(input: &Path, output: &Path, config: &ConvertConfig) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.display().to_string(),
        "-acodec".to_string(),
        config.codec.clone(),
        "-ar".to_string(),
        config.sample_rate.to_string(),
        "-ac".to_string(),
        config.channels.to_string(),
        "-y".to_string(),
        output.display().to_string(),
    ]
}

/// Re-encode one file.
pub async fn convert_file(
    ffmpeg: &Path,
    input: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<()> {
    info!("Converting {} to {}", input.display(), output.display());

    let status = Command::new(ffmpeg)
        .args(ffmpeg_args(input, output, config))
        .status()
        .await
        .context("Failed to spawn ffmpeg")?;

    if !status.success() {
        anyhow::bail!("ffmpeg failed for {}", input.display());
    }

    Ok(())
}
