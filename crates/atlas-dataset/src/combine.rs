use anyhow::Context;
use atlas_core::config::Config;
use atlas_core::{records, tables};
use tracing::info;

fn main() -> anyhow::Result<()> {
    atlas_core::logging::init();

    let config = Config::load()?;

    let tracks =
        records::read_tracks_with_coordinates(&config.paths.coordinates_csv).with_context(|| {
            format!(
                "failed to read coordinate-enriched metadata from {}",
                config.paths.coordinates_csv.display()
            )
        })?;
    let features = records::read_features(&config.paths.features_csv).with_context(|| {
        format!(
            "failed to read feature table from {}",
            config.paths.features_csv.display()
        )
    })?;

    let combined = tables::join_features(&tracks, &features);

    records::write_combined(&config.paths.combined_csv, &combined)?;
    info!(
        "Combined data saved to {} ({} of {} tracks had features)",
        config.paths.combined_csv.display(),
        combined.len(),
        tracks.len()
    );

    Ok(())
}
