mod collector;
mod lastfm;
mod musicbrainz;

use anyhow::Context;
use atlas_core::config::Config;
use atlas_core::mappings::{GenreMapping, TagCountryTable};
use atlas_core::records;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    atlas_core::logging::init();

    let config = Config::load()?;
    let api_key = std::env::var("LASTFM_API_KEY").context("LASTFM_API_KEY is not set")?;

    let genres = GenreMapping::load(&config.paths.genre_mapping).with_context(|| {
        format!(
            "failed to load genre mapping from {}",
            config.paths.genre_mapping.display()
        )
    })?;
    let tag_countries = TagCountryTable::load(&config.paths.tag_to_country).with_context(|| {
        format!(
            "failed to load tag/country table from {}",
            config.paths.tag_to_country.display()
        )
    })?;

    let mut collector =
        collector::Collector::new(api_key, genres, tag_countries, config.collect.clone());
    let tracks = collector.run().await;

    records::write_tracks(&config.paths.metadata_csv, &tracks)?;
    info!(
        "Metadata saved to {} ({} tracks)",
        config.paths.metadata_csv.display(),
        tracks.len()
    );

    Ok(())
}
