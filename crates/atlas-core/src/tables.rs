//! Pure join transforms over fully materialized tables.

use std::collections::HashMap;

use crate::records::{CombinedRow, CoordinateEntry, FeatureRow, TrackRecord, TrackWithCoordinates};
use crate::resolver::country_of_location;

/// Left join of track records with the country coordinate table.
///
/// The join key is the country derived from each track's location by the
/// last-comma rule, trimmed on both sides. Unmatched rows get exactly
/// (0.0, 0.0), so every output row carries coordinates.
pub fn join_coordinates(
    tracks: &[TrackRecord],
    coords: &[CoordinateEntry],
) -> Vec<TrackWithCoordinates> {
    let index: HashMap<&str, (f64, f64)> = coords
        .iter()
        .map(|entry| (entry.country.trim(), (entry.latitude, entry.longitude)))
        .collect();

    tracks
        .iter()
        .map(|track| {
            let country = track
                .location
                .as_deref()
                .map(|location| country_of_location(location).to_string())
                .unwrap_or_default();
            let (latitude, longitude) = index
                .get(country.as_str())
                .copied()
                .unwrap_or((0.0, 0.0));
            TrackWithCoordinates {
                track_id: track.track_id,
                track_slug: track.track_slug.clone(),
                track_name: track.track_name.clone(),
                artist_name: track.artist_name.clone(),
                location: track.location.clone(),
                listeners: track.listeners,
                genre: track.genre.clone(),
                country,
                latitude,
                longitude,
            }
        })
        .collect()
}

/// Inner join of coordinate-enriched tracks with the feature table on
/// track id = file number. Tracks without a feature row are dropped.
pub fn join_features(
    tracks: &[TrackWithCoordinates],
    features: &[FeatureRow],
) -> Vec<CombinedRow> {
    let index: HashMap<u64, &FeatureRow> = features
        .iter()
        .map(|row| (row.file_number, row))
        .collect();

    tracks
        .iter()
        .filter_map(|track| {
            index.get(&track.track_id).map(|row| CombinedRow {
                track: track.clone(),
                features: row.features.clone(),
            })
        })
        .collect()
}
