use std::path::PathBuf;

use anyhow::Context;
use atlas_audio::convert;
use atlas_core::config::Config;
use atlas_core::platform;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    atlas_core::logging::init();

    let config = Config::load()?;
    let ffmpeg = platform::find_ffmpeg()
        .context("ffmpeg not found; install it on PATH or set FFMPEG_PATH")?;

    let input_dir = &config.paths.downloads_dir;
    let output_dir = &config.paths.converted_dir;
    std::fs::create_dir_all(output_dir)?;

    let mut inputs: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
        })
        .collect();
    inputs.sort();

    let mut converted = 0usize;
    for input in &inputs {
        let file_name = match input.file_name() {
            Some(name) => name,
            None => continue,
        };
        let output = output_dir.join(file_name);

        match convert::convert_file(&ffmpeg, input, &output, &config.convert).await {
            Ok(()) => converted += 1,
            Err(e) => error!("Error converting {}: {:#}", input.display(), e),
        }
    }

    info!("Converted {} of {} files", converted, inputs.len());
    Ok(())
}
