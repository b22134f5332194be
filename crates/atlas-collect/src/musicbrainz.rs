//! MusicBrainz artist lookup.
//!
//! Only one endpoint is needed: `/ws/2/artist/{mbid}` with `fmt=json`, read
//! for the `area.name` field. MusicBrainz rejects requests without a
//! User-Agent identifying the application.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const MUSICBRAINZ_API_BASE: &str = "https://musicbrainz.org/ws/2";
const USER_AGENT: &str = "tune-atlas/0.1.0";

#[derive(Debug, Deserialize)]
struct ArtistResponse {
    area: Option<Area>,
}

#[derive(Debug, Deserialize)]
struct Area {
    name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MusicBrainzClient {
    http: Client,
}

impl MusicBrainzClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Area name for an artist MBID; `None` when the artist has no area.
    pub async fn artist_area(&self, mbid: &str) -> Result<Option<String>> {
        let url = format!("{}/artist/{}?fmt=json", MUSICBRAINZ_API_BASE, mbid);

        let response = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .context("MusicBrainz artist lookup failed")?;

        let result: ArtistResponse = response
            .json()
            .await
            .context("failed to parse MusicBrainz artist response")?;

        Ok(result.area.and_then(|area| area.name))
    }

    /// Bounded-retry wrapper around [`Self::artist_area`]: up to `retries`
    /// attempts with a fixed delay between them. The last error is returned
    /// once attempts are exhausted, so the caller decides whether the track
    /// is skipped or the run aborts.
    pub async fn artist_area_with_retry(
        &self,
        mbid: &str,
        retries: u32,
        delay: Duration,
    ) -> Result<Option<String>> {
        let attempts = retries.max(1);
        let mut last_err = None;

        for attempt in 1..=attempts {
            match self.artist_area(mbid).await {
                Ok(area) => return Ok(area),
                Err(e) => {
                    warn!(
                        "MusicBrainz lookup for {} failed (attempt {}/{}): {:#}",
                        mbid, attempt, attempts, e
                    );
                    last_err = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("MusicBrainz lookup for {} failed", mbid)))
    }
}

impl Default for MusicBrainzClient {
    fn default() -> Self {
        Self::new()
    }
}
