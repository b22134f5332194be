//! Record types and CSV I/O for every pipeline stage.
//!
//! Each stage reads its whole input into memory and writes its whole output
//! in one pass; reruns overwrite output files wholesale.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DataError, Result};

/// Timbral coefficients per feature row.
pub const N_MFCC: usize = 20;
/// Chroma bins per feature row.
pub const N_CHROMA: usize = 12;
/// Spectral-contrast bands per feature row.
pub const N_CONTRAST: usize = 7;
/// Harmonic-network coordinates per feature row.
pub const N_TONNETZ: usize = 6;
/// Total features per row, in {MFCC, chroma, contrast, tonnetz} order.
pub const FEATURE_COUNT: usize = N_MFCC + N_CHROMA + N_CONTRAST + N_TONNETZ;

/// One admitted track from the metadata collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Sequential numeric id, assigned at admission. Join key for the
    /// feature table and the audio file names.
    pub track_id: u64,
    /// External identifier: the final path segment of the Last.fm track URL.
    pub track_slug: Option<String>,
    pub track_name: String,
    pub artist_name: String,
    /// Resolved location string; admitted tracks always carry one.
    pub location: Option<String>,
    pub listeners: u64,
    pub genre: String,
}

/// One row of the static country coordinate reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateEntry {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// A track record enriched with its derived country and coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackWithCoordinates {
    pub track_id: u64,
    pub track_slug: Option<String>,
    pub track_name: String,
    pub artist_name: String,
    pub location: Option<String>,
    pub listeners: u64,
    pub genre: String,
    /// Country derived from the location by the last-comma rule; empty when
    /// the location is missing.
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the audio feature table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Matches the track id the audio file was downloaded under.
    pub file_number: u64,
    /// Always [`FEATURE_COUNT`] values.
    pub features: Vec<f32>,
}

/// A coordinate-enriched track joined with its feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub track: TrackWithCoordinates,
    pub features: Vec<f32>,
}

/// The fixed feature CSV header: file number plus one named column per
/// feature, in feature order.
pub fn feature_headers() -> Vec<String> {
    let mut headers = Vec::with_capacity(FEATURE_COUNT + 1);
    headers.push("File Number".to_string());
    for i in 1..=N_MFCC {
        headers.push(format!("MFCC{}", i));
    }
    for i in 1..=N_CHROMA {
        headers.push(format!("Chroma{}", i));
    }
    for i in 1..=N_CONTRAST {
        headers.push(format!("Spectral Contrast{}", i));
    }
    for i in 1..=N_TONNETZ {
        headers.push(format!("Tonnetz{}", i));
    }
    headers
}

pub fn read_tracks(path: &Path) -> Result<Vec<TrackRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn write_tracks(path: &Path, rows: &[TrackRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load the coordinate reference table, trimming country names so every row
/// is reachable as a join key.
pub fn read_coordinates(path: &Path) -> Result<Vec<CoordinateEntry>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows: Vec<CoordinateEntry> = Vec::new();
    for record in reader.deserialize() {
        let mut entry: CoordinateEntry = record?;
        entry.country = entry.country.trim().to_string();
        rows.push(entry);
    }
    Ok(rows)
}

pub fn read_tracks_with_coordinates(path: &Path) -> Result<Vec<TrackWithCoordinates>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn write_tracks_with_coordinates(path: &Path, rows: &[TrackWithCoordinates]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the feature table. The header is positional, so rows are parsed by
/// hand; a non-numeric file number or feature is a validation error, not a
/// silently dropped row.
pub fn read_features(path: &Path) -> Result<Vec<FeatureRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let file_field = record.get(0).unwrap_or_default();
        let file_number: u64 = file_field.parse().map_err(|_| DataError::InvalidNumber {
            context: "feature column \"File Number\"".to_string(),
            value: file_field.to_string(),
        })?;
        let mut features = Vec::with_capacity(FEATURE_COUNT);
        for field in record.iter().skip(1) {
            let value: f32 = field.parse().map_err(|_| DataError::InvalidNumber {
                context: format!("feature row {}", file_number),
                value: field.to_string(),
            })?;
            features.push(value);
        }
        if features.len() != FEATURE_COUNT {
            return Err(DataError::InvalidNumber {
                context: format!(
                    "feature row {} (expected {} features, found {})",
                    file_number,
                    FEATURE_COUNT,
                    features.len()
                ),
                value: String::new(),
            });
        }
        rows.push(FeatureRow {
            file_number,
            features,
        });
    }
    Ok(rows)
}

pub fn write_features(path: &Path, rows: &[FeatureRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(feature_headers())?;
    for row in rows {
        debug_assert_eq!(row.features.len(), FEATURE_COUNT);
        let mut record = Vec::with_capacity(FEATURE_COUNT + 1);
        record.push(row.file_number.to_string());
        record.extend(row.features.iter().map(|v| v.to_string()));
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the combined dataset: every coordinate-enriched column followed by
/// the named feature columns. The redundant file-number column is dropped.
pub fn write_combined(path: &Path, rows: &[CombinedRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = [
        "track_id",
        "track_slug",
        "track_name",
        "artist_name",
        "location",
        "listeners",
        "genre",
        "country",
        "latitude",
        "longitude",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(feature_headers().into_iter().skip(1));
    writer.write_record(&header)?;

    for row in rows {
        let t = &row.track;
        let mut record: Vec<String> = vec![
            t.track_id.to_string(),
            t.track_slug.clone().unwrap_or_default(),
            t.track_name.clone(),
            t.artist_name.clone(),
            t.location.clone().unwrap_or_default(),
            t.listeners.to_string(),
            t.genre.clone(),
            t.country.clone(),
            t.latitude.to_string(),
            t.longitude.to_string(),
        ];
        record.extend(row.features.iter().map(|v| v.to_string()));
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_track(id: u64, location: Option<&str>) -> TrackRecord {
        TrackRecord {
            track_id: id,
            track_slug: Some(format!("Track+{}", id)),
            track_name: format!("Track {}", id),
            artist_name: "Some Artist".to_string(),
            location: location.map(str::to_string),
            listeners: 12345,
            genre: "Rock".to_string(),
        }
    }

    #[test]
    fn test_feature_headers_fixed_width() {
        let headers = feature_headers();
        assert_eq!(headers.len(), FEATURE_COUNT + 1);
        assert_eq!(headers[0], "File Number");
        assert_eq!(headers[1], "MFCC1");
        assert_eq!(headers[20], "MFCC20");
        assert_eq!(headers[21], "Chroma1");
        assert_eq!(headers[32], "Chroma12");
        assert_eq!(headers[33], "Spectral Contrast1");
        assert_eq!(headers[39], "Spectral Contrast7");
        assert_eq!(headers[40], "Tonnetz1");
        assert_eq!(headers[45], "Tonnetz6");
    }

    #[test]
    fn test_track_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracks.csv");
        let rows = vec![
            sample_track(1, Some("Lagos, Nigeria")),
            sample_track(2, None),
        ];

        write_tracks(&path, &rows).unwrap();
        let read = read_tracks(&path).unwrap();

        assert_eq!(read, rows);
        assert_eq!(read[1].location, None);
    }

    #[test]
    fn test_read_coordinates_trims_country() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("coords.csv");
        std::fs::write(
            &path,
            "Country,Latitude,Longitude\n  Nigeria ,9.082,8.6753\nJapan,36.2048,138.2529\n",
        )
        .unwrap();

        let rows = read_coordinates(&path).unwrap();
        assert_eq!(rows[0].country, "Nigeria");
        assert_eq!(rows[0].latitude, 9.082);
        assert_eq!(rows[1].country, "Japan");
    }

    #[test]
    fn test_feature_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.csv");
        let rows = vec![FeatureRow {
            file_number: 3,
            features: (0..FEATURE_COUNT).map(|i| i as f32 * 0.5).collect(),
        }];

        write_features(&path, &rows).unwrap();
        let read = read_features(&path).unwrap();

        assert_eq!(read, rows);
    }

    #[test]
    fn test_read_features_rejects_non_numeric_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.csv");
        let mut content = feature_headers().join(",");
        content.push('\n');
        content.push_str("abc");
        for _ in 0..FEATURE_COUNT {
            content.push_str(",0.0");
        }
        content.push('\n');
        std::fs::write(&path, content).unwrap();

        let err = read_features(&path).unwrap_err();
        assert!(matches!(err, DataError::InvalidNumber { .. }));
    }

    #[test]
    fn test_write_combined_drops_file_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("all.csv");
        let track = TrackWithCoordinates {
            track_id: 3,
            track_slug: None,
            track_name: "Ye".to_string(),
            artist_name: "Burna Boy".to_string(),
            location: Some("Lagos, Nigeria".to_string()),
            listeners: 1,
            genre: "African".to_string(),
            country: "Nigeria".to_string(),
            latitude: 9.082,
            longitude: 8.6753,
        };
        let rows = vec![CombinedRow {
            track,
            features: vec![0.0; FEATURE_COUNT],
        }];

        write_combined(&path, &rows).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert!(!header.contains("File Number"));
        assert!(header.starts_with("track_id,"));
        assert!(header.ends_with("Tonnetz6"));
        assert_eq!(header.split(',').count(), 10 + FEATURE_COUNT);
    }
}
