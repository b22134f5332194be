use anyhow::Context;
use atlas_core::config::Config;
use atlas_core::{records, tables};
use tracing::info;

fn main() -> anyhow::Result<()> {
    atlas_core::logging::init();

    let config = Config::load()?;

    let tracks = records::read_tracks(&config.paths.metadata_csv).with_context(|| {
        format!(
            "failed to read metadata from {}",
            config.paths.metadata_csv.display()
        )
    })?;
    let coords = records::read_coordinates(&config.paths.country_coordinates).with_context(|| {
        format!(
            "failed to read coordinate table from {}",
            config.paths.country_coordinates.display()
        )
    })?;

    let joined = tables::join_coordinates(&tracks, &coords);
    let matched = joined.iter().filter(|row| row.latitude != 0.0 || row.longitude != 0.0).count();

    records::write_tracks_with_coordinates(&config.paths.coordinates_csv, &joined)?;
    info!(
        "Metadata with coordinates saved to {} ({} tracks, {} matched the reference table)",
        config.paths.coordinates_csv.display(),
        joined.len(),
        matched
    );

    Ok(())
}
