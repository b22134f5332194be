use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

/// File locations for every stage, resolved relative to the run directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Genre → tag-list mapping JSON.
    #[serde(default = "default_genre_mapping")]
    pub genre_mapping: PathBuf,
    /// Tag → country mapping JSON.
    #[serde(default = "default_tag_to_country")]
    pub tag_to_country: PathBuf,
    /// Static country coordinate reference CSV.
    #[serde(default = "default_country_coordinates")]
    pub country_coordinates: PathBuf,
    /// Collector output: one row per admitted track.
    #[serde(default = "default_metadata_csv")]
    pub metadata_csv: PathBuf,
    /// Coordinate-join output.
    #[serde(default = "default_coordinates_csv")]
    pub coordinates_csv: PathBuf,
    /// Feature-extraction output.
    #[serde(default = "default_features_csv")]
    pub features_csv: PathBuf,
    /// Final combined dataset.
    #[serde(default = "default_combined_csv")]
    pub combined_csv: PathBuf,
    /// Directory for raw yt-dlp downloads.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,
    /// Directory for normalized audio.
    #[serde(default = "default_converted_dir")]
    pub converted_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Tracks requested per tag from `tag.getTopTracks`.
    #[serde(default = "default_tracks_per_tag")]
    pub tracks_per_tag: u32,
    /// Admission cap per resolved country.
    #[serde(default = "default_max_per_country")]
    pub max_per_country: u32,
    /// Pause after each processed track, to stay under API rate limits.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Attempts for the MusicBrainz area lookup.
    #[serde(default = "default_lookup_retries")]
    pub lookup_retries: u32,
    /// Pause between MusicBrainz attempts.
    #[serde(default = "default_lookup_retry_delay_secs")]
    pub lookup_retry_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default = "default_codec")]
    pub codec: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u8,
}

/// Analysis parameters for the feature extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_n_fft")]
    pub n_fft: usize,
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    #[serde(default = "default_n_mels")]
    pub n_mels: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            genre_mapping: default_genre_mapping(),
            tag_to_country: default_tag_to_country(),
            country_coordinates: default_country_coordinates(),
            metadata_csv: default_metadata_csv(),
            coordinates_csv: default_coordinates_csv(),
            features_csv: default_features_csv(),
            combined_csv: default_combined_csv(),
            downloads_dir: default_downloads_dir(),
            converted_dir: default_converted_dir(),
        }
    }
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            tracks_per_tag: default_tracks_per_tag(),
            max_per_country: default_max_per_country(),
            request_delay_ms: default_request_delay_ms(),
            lookup_retries: default_lookup_retries(),
            lookup_retry_delay_secs: default_lookup_retry_delay_secs(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            n_fft: default_n_fft(),
            hop_length: default_hop_length(),
            n_mels: default_n_mels(),
        }
    }
}

fn default_genre_mapping() -> PathBuf {
    PathBuf::from("data/genre_mapping.json")
}

fn default_tag_to_country() -> PathBuf {
    PathBuf::from("data/tag_to_country.json")
}

fn default_country_coordinates() -> PathBuf {
    PathBuf::from("data/country_coordinates.csv")
}

fn default_metadata_csv() -> PathBuf {
    PathBuf::from("world_music.csv")
}

fn default_coordinates_csv() -> PathBuf {
    PathBuf::from("tracks_with_coordinates.csv")
}

fn default_features_csv() -> PathBuf {
    PathBuf::from("audio_features.csv")
}

fn default_combined_csv() -> PathBuf {
    PathBuf::from("all_data.csv")
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloaded_songs")
}

fn default_converted_dir() -> PathBuf {
    PathBuf::from("converted_songs")
}

fn default_tracks_per_tag() -> u32 {
    20
}

fn default_max_per_country() -> u32 {
    50
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_lookup_retries() -> u32 {
    3
}

fn default_lookup_retry_delay_secs() -> u64 {
    3
}

fn default_codec() -> String {
    "pcm_s16le".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u8 {
    2
}

fn default_n_fft() -> usize {
    2048
}

fn default_hop_length() -> usize {
    512
}

fn default_n_mels() -> usize {
    128
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            collect: CollectConfig::default(),
            convert: ConvertConfig::default(),
            features: FeaturesConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.collect.tracks_per_tag, 20);
        assert_eq!(config.collect.max_per_country, 50);
        assert_eq!(config.collect.lookup_retries, 3);
        assert_eq!(config.convert.codec, "pcm_s16le");
        assert_eq!(config.convert.sample_rate, 44100);
        assert_eq!(config.convert.channels, 2);
        assert!(config.paths.metadata_csv.ends_with("world_music.csv"));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.collect.max_per_country, 50);
        assert_eq!(config.features.n_fft, 2048);
        assert_eq!(config.features.hop_length, 512);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[collect]\nmax_per_country = 10\n").unwrap();
        assert_eq!(config.collect.max_per_country, 10);
        assert_eq!(config.collect.tracks_per_tag, 20);
        assert_eq!(config.convert.sample_rate, 44100);
    }
}
