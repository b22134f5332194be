mod extract;

use std::path::PathBuf;

use anyhow::Context;
use atlas_core::config::Config;
use atlas_core::records::{self, FeatureRow};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    atlas_core::logging::init();

    let config = Config::load()?;
    let audio_dir = &config.paths.converted_dir;

    let mut files: Vec<PathBuf> = std::fs::read_dir(audio_dir)
        .with_context(|| format!("failed to read {}", audio_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    let mut rows = Vec::new();
    for path in &files {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let file_number: u64 = match stem.parse() {
            Ok(number) => number,
            Err(_) => {
                warn!(
                    "Skipping {} (file stem is not a numeric track id)",
                    path.display()
                );
                continue;
            }
        };

        match extract::extract_features(path, &config.features) {
            Ok(features) => {
                info!("Extracted features for {}", path.display());
                rows.push(FeatureRow {
                    file_number,
                    features,
                });
            }
            Err(e) => warn!("Failed to extract features for {}: {:#}", path.display(), e),
        }
    }

    records::write_features(&config.paths.features_csv, &rows)?;
    info!(
        "Features saved to {} ({} of {} files)",
        config.paths.features_csv.display(),
        rows.len(),
        files.len()
    );

    Ok(())
}
