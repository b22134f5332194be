//! The metadata collection loop.
//!
//! For each search tag: fetch the tag's top tracks, resolve each track's
//! artist location (Last.fm → MusicBrainz, falling back to the static tag
//! table), categorize the genre, and admit the track if its country is
//! still under the cap. One failed track never aborts the batch.

use std::time::Duration;

use atlas_core::config::CollectConfig;
use atlas_core::mappings::{GenreMapping, TagCountryTable};
use atlas_core::records::TrackRecord;
use atlas_core::resolver::{CountryQuota, LocationOutcome};
use tracing::{debug, info, warn};

use crate::lastfm::{ArtistInfo, LastFmClient, TagTrack};
use crate::musicbrainz::MusicBrainzClient;

pub struct Collector {
    lastfm: LastFmClient,
    musicbrainz: MusicBrainzClient,
    genres: GenreMapping,
    tag_countries: TagCountryTable,
    quota: CountryQuota,
    config: CollectConfig,
}

impl Collector {
    pub fn new(
        api_key: String,
        genres: GenreMapping,
        tag_countries: TagCountryTable,
        config: CollectConfig,
    ) -> Self {
        Self {
            lastfm: LastFmClient::new(api_key),
            musicbrainz: MusicBrainzClient::new(),
            quota: CountryQuota::new(config.max_per_country),
            genres,
            tag_countries,
            config,
        }
    }

    /// Run the whole collection pass and return the admitted records.
    pub async fn run(&mut self) -> Vec<TrackRecord> {
        let tags = self.tag_countries.all_tags();
        let mut records = Vec::new();
        let mut next_id: u64 = 1;

        for tag in &tags {
            let tracks = match self
                .lastfm
                .top_tracks_by_tag(tag, self.config.tracks_per_tag)
                .await
            {
                Ok(tracks) => tracks,
                Err(e) => {
                    warn!("Fetching top tracks for tag {:?} failed: {:#}", tag, e);
                    continue;
                }
            };
            info!("Tag {:?}: {} candidate tracks", tag, tracks.len());

            for track in tracks {
                if let Some(record) = self.collect_track(tag, &track, next_id).await {
                    records.push(record);
                    next_id += 1;
                }
                // Avoid hitting the APIs too quickly.
                tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
            }
        }

        info!("Collected {} tracks across {} tags", records.len(), tags.len());
        records
    }

    /// Resolve one candidate; returns a record only when its country is
    /// admitted.
    async fn collect_track(
        &mut self,
        tag: &str,
        track: &TagTrack,
        track_id: u64,
    ) -> Option<TrackRecord> {
        let artist = match &track.artist {
            Some(artist) => artist,
            None => {
                warn!("Track {:?} has no artist, skipping", track.name);
                return None;
            }
        };

        let (outcome, info) = self
            .resolve_location(&artist.name, artist.known_mbid(), tag)
            .await;

        let location = match outcome.location() {
            Some(location) => location.to_string(),
            None => {
                debug!("No location for {:?} by {:?}", track.name, artist.name);
                return None;
            }
        };

        if !self.quota.admit(&location) {
            debug!(
                "Country cap reached, dropping {:?} by {:?} ({})",
                track.name, artist.name, location
            );
            return None;
        }

        Some(TrackRecord {
            track_id,
            track_slug: track.url.as_deref().and_then(track_slug),
            track_name: track.name.clone(),
            artist_name: artist.name.clone(),
            location: Some(location),
            listeners: info.as_ref().map(|i| i.listener_count()).unwrap_or(0),
            genre: self.genres.categorize(tag).to_string(),
        })
    }

    /// Try the artist-info services, then the static tag table.
    ///
    /// An MBID carried by the track itself wins over one from
    /// `artist.getInfo`. A MusicBrainz lookup that exhausts its retries is
    /// logged and treated like any other miss; the tag table still applies.
    async fn resolve_location(
        &self,
        artist_name: &str,
        track_mbid: Option<&str>,
        tag: &str,
    ) -> (LocationOutcome, Option<ArtistInfo>) {
        let info = match self.lastfm.artist_info(artist_name).await {
            Ok(Some(info)) => Some(info),
            Ok(None) => {
                warn!("Invalid or empty artist info for {:?}", artist_name);
                None
            }
            Err(e) => {
                warn!("artist.getInfo for {:?} failed: {:#}", artist_name, e);
                None
            }
        };

        let mbid = track_mbid
            .map(str::to_string)
            .or_else(|| info.as_ref().and_then(|i| i.known_mbid().map(str::to_string)));

        match mbid {
            Some(mbid) => {
                let lookup = self
                    .musicbrainz
                    .artist_area_with_retry(
                        &mbid,
                        self.config.lookup_retries,
                        Duration::from_secs(self.config.lookup_retry_delay_secs),
                    )
                    .await;
                match lookup {
                    Ok(Some(area)) => return (LocationOutcome::Resolved(area), info),
                    Ok(None) => warn!("No location found for MBID {}", mbid),
                    Err(e) => warn!(
                        "Giving up on MBID {} after {} attempts: {:#}",
                        mbid, self.config.lookup_retries, e
                    ),
                }
            }
            None => {
                if info.is_some() {
                    warn!("No MBID found for artist {:?}", artist_name);
                }
            }
        }

        match self.tag_countries.country_for_tag(tag) {
            Some(country) => (LocationOutcome::Fallback(country.to_string()), info),
            None => (LocationOutcome::Unresolved, info),
        }
    }
}

/// External track identifier: the final path segment of the Last.fm URL.
pub fn track_slug(url: &str) -> Option<String> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_slug() {
        assert_eq!(
            track_slug("https://www.last.fm/music/Burna+Boy/_/Ye"),
            Some("Ye".to_string())
        );
        assert_eq!(
            track_slug("https://www.last.fm/music/Orchestra+Baobab/_/Utru+Horas/"),
            Some("Utru+Horas".to_string())
        );
        assert_eq!(track_slug(""), None);
        assert_eq!(track_slug("///"), None);
    }
}
