//! Last.fm API client.
//!
//! Two methods are used: `tag.getTopTracks` to enumerate candidate tracks
//! per search tag, and `artist.getInfo` for the artist's MBID and listener
//! count. Last.fm nests JSON awkwardly and serves numbers as strings, so the
//! response types below are tolerant of missing fields.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";
const USER_AGENT: &str = "tune-atlas/0.1.0";

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: TrackList,
}

#[derive(Debug, Default, Deserialize)]
struct TrackList {
    #[serde(default)]
    track: Vec<TagTrack>,
}

/// One entry from `tag.getTopTracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagTrack {
    pub name: String,
    pub url: Option<String>,
    pub artist: Option<TrackArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub name: String,
    pub mbid: Option<String>,
}

impl TrackArtist {
    /// MBID if present and non-empty (Last.fm serves `""` for unknown).
    pub fn known_mbid(&self) -> Option<&str> {
        self.mbid.as_deref().filter(|mbid| !mbid.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ArtistInfoResponse {
    artist: Option<ArtistInfo>,
}

/// The artist block of `artist.getInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfo {
    pub mbid: Option<String>,
    #[serde(default)]
    pub stats: ArtistStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistStats {
    pub listeners: Option<String>,
}

impl ArtistInfo {
    pub fn known_mbid(&self) -> Option<&str> {
        self.mbid.as_deref().filter(|mbid| !mbid.is_empty())
    }

    /// Listener count; 0 when absent or unparsable.
    pub fn listener_count(&self) -> u64 {
        self.stats
            .listeners
            .as_deref()
            .and_then(|listeners| listeners.parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct LastFmClient {
    http: Client,
    api_key: String,
}

impl LastFmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            api_key,
        }
    }

    /// Top tracks for a tag via `tag.getTopTracks`.
    pub async fn top_tracks_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<TagTrack>> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(LASTFM_API_BASE)
            .query(&[
                ("method", "tag.getTopTracks"),
                ("tag", tag),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()
            .context("tag.getTopTracks failed")?;

        let result: TopTracksResponse = response
            .json()
            .await
            .context("failed to parse tag.getTopTracks response")?;

        Ok(result.tracks.track)
    }

    /// Artist info via `artist.getInfo`; `None` when the payload carries no
    /// artist block.
    pub async fn artist_info(&self, artist: &str) -> Result<Option<ArtistInfo>> {
        let response = self
            .http
            .get(LASTFM_API_BASE)
            .query(&[
                ("method", "artist.getInfo"),
                ("artist", artist),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()
            .context("artist.getInfo failed")?;

        let result: ArtistInfoResponse = response
            .json()
            .await
            .context("failed to parse artist.getInfo response")?;

        Ok(result.artist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_tracks_deserialize() {
        let json = r#"{
            "tracks": {
                "track": [
                    {
                        "name": "Ye",
                        "url": "https://www.last.fm/music/Burna+Boy/_/Ye",
                        "artist": {"name": "Burna Boy", "mbid": "00a9f935-ba93-4fc8-a33a-993abe9c936b"}
                    },
                    {"name": "Untitled", "artist": {"name": "Unknown", "mbid": ""}}
                ]
            }
        }"#;
        let result: TopTracksResponse = serde_json::from_str(json).unwrap();
        let tracks = result.tracks.track;
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].name, "Ye");
        assert!(tracks[0].artist.as_ref().unwrap().known_mbid().is_some());
        assert_eq!(tracks[1].url, None);
        assert_eq!(tracks[1].artist.as_ref().unwrap().known_mbid(), None);
    }

    #[test]
    fn test_top_tracks_missing_sections_default_to_empty() {
        let empty: TopTracksResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.tracks.track.is_empty());

        let no_track: TopTracksResponse = serde_json::from_str(r#"{"tracks": {}}"#).unwrap();
        assert!(no_track.tracks.track.is_empty());
    }

    #[test]
    fn test_artist_info_deserialize() {
        let json = r#"{
            "artist": {
                "mbid": "00a9f935-ba93-4fc8-a33a-993abe9c936b",
                "stats": {"listeners": "1934287", "playcount": "39201811"}
            }
        }"#;
        let result: ArtistInfoResponse = serde_json::from_str(json).unwrap();
        let info = result.artist.unwrap();
        assert_eq!(info.listener_count(), 1934287);
        assert_eq!(info.known_mbid(), Some("00a9f935-ba93-4fc8-a33a-993abe9c936b"));
    }

    #[test]
    fn test_artist_info_defaults() {
        let result: ArtistInfoResponse = serde_json::from_str(r#"{"artist": {}}"#).unwrap();
        let info = result.artist.unwrap();
        assert_eq!(info.listener_count(), 0);
        assert_eq!(info.known_mbid(), None);

        let missing: ArtistInfoResponse =
            serde_json::from_str(r#"{"error": 6, "message": "The artist you supplied could not be found"}"#)
                .unwrap();
        assert!(missing.artist.is_none());
    }

    #[test]
    fn test_listener_count_ignores_garbage() {
        let info = ArtistInfo {
            mbid: None,
            stats: ArtistStats {
                listeners: Some("not-a-number".to_string()),
            },
        };
        assert_eq!(info.listener_count(), 0);
    }
}
