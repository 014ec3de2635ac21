//! MusicBrainz WS/2 client.
//!
//! Every request goes through one limiter owned by the client handle, so all
//! callers sharing an `Arc<MusicBrainzClient>` run one at a time, each
//! starting at least `min_interval` after the previous one finished (the service allows roughly one request per second
//! and asks for an identifying `User-Agent`).

pub mod error;
pub mod types;

pub use error::{MusicBrainzError, Result};
pub use types::{
    Alias, Artist, ArtistCredit, ArtistMatch, ArtistSearchResponse, CreditedArtist, Label,
    LabelInfo, LifeSpan, Medium, Release, ReleaseGroup, ReleaseSearchResponse, Tag, Track,
};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

const BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// Per-request ceiling.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Spacing between consecutive requests from one client handle.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1100);

/// Related data pulled inline with a release search.
const RELEASE_INCLUDES: &str = "artist-credits+labels+recordings+release-groups";

pub struct MusicBrainzClient {
    client: reqwest::Client,
    base_url: String,
    min_interval: Duration,
    last_completed: Arc<Mutex<Option<Instant>>>,
}

impl MusicBrainzClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| MusicBrainzError::Config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| MusicBrainzError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            min_interval: DEFAULT_MIN_INTERVAL,
            last_completed: Arc::new(Mutex::new(None)),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Run `request` once `min_interval` has passed since the previous
    /// request completed, then stamp the completion time. The lock is held
    /// for the whole request, so callers sharing a handle go one at a time and
    /// a slow response still leaves the full gap before the next request.
    async fn throttled<F: Future>(&self, request: F) -> F::Output {
        let mut last_completed = self.last_completed.lock().await;

        if let Some(last) = *last_completed {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Spacing MusicBrainz request");
                sleep(wait).await;
            }
        }

        let output = request.await;
        *last_completed = Some(Instant::now());
        output
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        self.throttled(self.send_json(path_and_query)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(url = %url, "MusicBrainz request");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MusicBrainzError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fuzzy artist search. Candidates come back ranked by match score.
    pub async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistMatch>> {
        let path = format!(
            "/artist/?query={}&fmt=json&limit={}",
            urlencoding::encode(query),
            limit
        );
        let resp: ArtistSearchResponse = self.get_json(&path).await?;
        Ok(resp.artists)
    }

    /// Best-ranked release matching both the exact album title and artist
    /// name, with artist credits, labels, track listing and release group.
    pub async fn search_release(&self, album: &str, artist: &str) -> Result<Option<Release>> {
        let query = release_query(album, artist);
        let path = format!(
            "/release/?query={}&fmt=json&limit=1&inc={}",
            urlencoding::encode(&query),
            RELEASE_INCLUDES
        );
        let resp: ReleaseSearchResponse = self.get_json(&path).await?;
        Ok(resp.releases.into_iter().next())
    }

    /// Artist lookup by MBID including tags and genres.
    pub async fn lookup_artist(&self, artist_id: &str) -> Result<Artist> {
        let path = format!(
            "/artist/{}?fmt=json&inc=tags+genres",
            urlencoding::encode(artist_id)
        );
        self.get_json(&path).await
    }
}

/// Lucene query with both fields as quoted phrases.
pub fn release_query(album: &str, artist: &str) -> String {
    format!(
        "release:\"{}\" AND artist:\"{}\"",
        escape_phrase(album),
        escape_phrase(artist)
    )
}

fn escape_phrase(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_query_quotes_both_fields() {
        assert_eq!(
            release_query("OK Computer", "Radiohead"),
            "release:\"OK Computer\" AND artist:\"Radiohead\""
        );
    }

    #[test]
    fn test_release_query_escapes_embedded_quotes() {
        assert_eq!(
            release_query("The \"Blue\" Album", "Weezer"),
            "release:\"The \\\"Blue\\\" Album\" AND artist:\"Weezer\""
        );
    }

    #[test]
    fn test_rejects_unprintable_user_agent() {
        assert!(matches!(
            MusicBrainzClient::new("bad\nagent"),
            Err(MusicBrainzError::Config(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_not_delayed() {
        let client = MusicBrainzClient::new("test/1.0").unwrap();
        let start = Instant::now();
        client.throttled(async {}).await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_requests_are_spaced() {
        let client = MusicBrainzClient::new("test/1.0").unwrap();

        client.throttled(async {}).await;
        let start = Instant::now();
        client.throttled(async {}).await;
        assert!(start.elapsed() >= DEFAULT_MIN_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_has_passed() {
        let client = MusicBrainzClient::new("test/1.0").unwrap();

        client.throttled(async {}).await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        let start = Instant::now();
        client.throttled(async {}).await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_interval() {
        let client = MusicBrainzClient::new("test/1.0")
            .unwrap()
            .with_min_interval(Duration::from_millis(250));
        assert_eq!(client.min_interval(), Duration::from_millis(250));

        client.throttled(async {}).await;
        let start = Instant::now();
        client.throttled(async {}).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < DEFAULT_MIN_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_counts_from_when_a_slow_request_finished() {
        let client = MusicBrainzClient::new("test/1.0").unwrap();

        client
            .throttled(tokio::time::sleep(Duration::from_secs(3)))
            .await;

        let start = Instant::now();
        client.throttled(async {}).await;
        assert!(start.elapsed() >= DEFAULT_MIN_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_are_serialized() {
        let client = MusicBrainzClient::new("test/1.0").unwrap();
        let start = Instant::now();

        let slow = client.throttled(tokio::time::sleep(Duration::from_millis(500)));
        let next = client.throttled(async { Instant::now() });
        let ((), next_started) = tokio::join!(slow, next);

        assert!(next_started - start >= Duration::from_millis(500) + DEFAULT_MIN_INTERVAL);
    }
}
