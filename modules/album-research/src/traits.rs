// Trait abstractions for the research pipeline's external dependencies.
//
// CatalogService wraps the MusicBrainz client (artist search, release search,
// artist lookup). PageFetcher is the single HTTP GET seam for encyclopedia and
// review-site pages. ResearchStore is the persistence boundary for finished
// research records; no implementation lives in this crate besides the
// in-memory test double.
//
// Mocks for all three live in `testing.rs`: no network, no database.

use anyhow::Result;
use async_trait::async_trait;

use musicbrainz_client::{Artist, ArtistMatch, MusicBrainzClient, Release};

use crate::error::FetchFailure;
use crate::fetcher::FetchOptions;
use crate::types::ResearchRecord;

// ---------------------------------------------------------------------------
// CatalogService
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fuzzy artist search; candidates ranked by match score.
    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistMatch>>;

    /// Best release matching both album title and artist name.
    async fn search_release(&self, album: &str, artist: &str) -> Result<Option<Release>>;

    /// Artist by catalog id, with tags and genres.
    async fn lookup_artist(&self, artist_id: &str) -> Result<Artist>;
}

#[async_trait]
impl CatalogService for MusicBrainzClient {
    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistMatch>> {
        Ok(self.search_artists(query, limit).await?)
    }

    async fn search_release(&self, album: &str, artist: &str) -> Result<Option<Release>> {
        Ok(self.search_release(album, artist).await?)
    }

    async fn lookup_artist(&self, artist_id: &str) -> Result<Artist> {
        Ok(self.lookup_artist(artist_id).await?)
    }
}

// ---------------------------------------------------------------------------
// PageFetcher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the raw body. Timeouts, transport errors and
    /// non-2xx statuses are all `FetchFailure`s.
    async fn fetch(&self, url: &str, options: &FetchOptions) -> std::result::Result<String, FetchFailure>;
}

// ---------------------------------------------------------------------------
// ResearchStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ResearchStore: Send + Sync {
    /// Persist a record and return its assigned id.
    async fn save_research(&self, record: &ResearchRecord) -> Result<i64>;

    async fn find_research(&self, id: i64) -> Result<Option<ResearchRecord>>;
}
