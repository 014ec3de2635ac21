// Test mocks for the research pipeline.
//
// One mock per trait boundary:
// - MockCatalog (CatalogService): registered search/lookup responses, call log
// - MockFetcher (PageFetcher): HashMap-based URL→HTML, optional per-URL delay
// - MockGenerator (TextGenerator): canned model response, request log
// - InMemoryResearchStore (ResearchStore): Vec-backed record store
//
// Plus small constructors for catalog payloads.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use ai_client::{GenerationRequest, TextGenerator};
use musicbrainz_client::{Artist, ArtistMatch, Release};

use crate::error::FetchFailure;
use crate::fetcher::FetchOptions;
use crate::traits::{CatalogService, PageFetcher, ResearchStore};
use crate::types::ResearchRecord;

// ---------------------------------------------------------------------------
// Catalog payload helpers
// ---------------------------------------------------------------------------

pub fn artist_match(name: &str, score: u8) -> ArtistMatch {
    ArtistMatch {
        id: format!("mbid-{}", name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        score,
        sort_name: None,
        aliases: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// MockCatalog
// ---------------------------------------------------------------------------

/// Registered catalog responses. Unregistered artist searches return no
/// candidates, unregistered release searches return no release, and
/// unregistered artist lookups fail. `.failing()` makes every call fail.
pub struct MockCatalog {
    artist_searches: HashMap<String, Vec<ArtistMatch>>,
    releases: HashMap<(String, String), Release>,
    artists: HashMap<String, Artist>,
    fail_all: bool,
    calls: Mutex<CatalogCalls>,
}

#[derive(Default)]
struct CatalogCalls {
    artist_searches: Vec<(String, u32)>,
    release_searches: Vec<(String, String)>,
    artist_lookups: Vec<String>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            artist_searches: HashMap::new(),
            releases: HashMap::new(),
            artists: HashMap::new(),
            fail_all: false,
            calls: Mutex::new(CatalogCalls::default()),
        }
    }

    pub fn on_artist_search(mut self, query: &str, candidates: Vec<ArtistMatch>) -> Self {
        self.artist_searches.insert(query.to_string(), candidates);
        self
    }

    pub fn on_release(mut self, album: &str, artist: &str, release: Release) -> Self {
        self.releases
            .insert((album.to_string(), artist.to_string()), release);
        self
    }

    pub fn on_artist(mut self, artist_id: &str, artist: Artist) -> Self {
        self.artists.insert(artist_id.to_string(), artist);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// (query, limit) per artist search, in call order.
    pub fn artist_searches(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().artist_searches.clone()
    }

    /// (album, artist) per release search, in call order.
    pub fn release_searches(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().release_searches.clone()
    }

    pub fn artist_lookups(&self) -> Vec<String> {
        self.calls.lock().unwrap().artist_lookups.clone()
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistMatch>> {
        self.calls
            .lock()
            .unwrap()
            .artist_searches
            .push((query.to_string(), limit));
        if self.fail_all {
            bail!("MockCatalog: artist search failed for {query}");
        }
        Ok(self.artist_searches.get(query).cloned().unwrap_or_default())
    }

    async fn search_release(&self, album: &str, artist: &str) -> Result<Option<Release>> {
        self.calls
            .lock()
            .unwrap()
            .release_searches
            .push((album.to_string(), artist.to_string()));
        if self.fail_all {
            bail!("MockCatalog: release search failed for {album} / {artist}");
        }
        Ok(self
            .releases
            .get(&(album.to_string(), artist.to_string()))
            .cloned())
    }

    async fn lookup_artist(&self, artist_id: &str) -> Result<Artist> {
        self.calls
            .lock()
            .unwrap()
            .artist_lookups
            .push(artist_id.to_string());
        if self.fail_all {
            bail!("MockCatalog: artist lookup failed for {artist_id}");
        }
        self.artists
            .get(artist_id)
            .cloned()
            .ok_or_else(|| anyhow!("MockCatalog: no artist registered for {artist_id}"))
    }
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// HashMap-based page fetcher. Unregistered URLs fail with a 404 status.
/// Builder pattern: `.on_page()`, `.on_page_delayed()`, `.on_failure()`.
pub struct MockFetcher {
    pages: HashMap<String, Result<String, FetchFailure>>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<(String, FetchOptions)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    /// Respond only after `delay`, to reorder completions.
    pub fn on_page_delayed(mut self, url: &str, html: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self.on_page(url, html)
    }

    pub fn on_failure(mut self, url: &str, failure: FetchFailure) -> Self {
        self.pages.insert(url.to_string(), Err(failure));
        self
    }

    /// Every requested URL, in call order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn options_for(&self, url: &str) -> Option<FetchOptions> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(requested, _)| requested == url)
            .map(|(_, options)| options.clone())
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchFailure> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        self.pages
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchFailure::Status(404)))
    }
}

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// Returns one canned response (or error) for every request and records
/// what it was asked.
pub struct MockGenerator {
    response: Result<String, String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            response: Err("MockGenerator: no response registered".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, text: &str) -> Self {
        self.response = Ok(text.to_string());
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.response = Err(message.to_string());
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone().map_err(|message| anyhow!(message))
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

// ---------------------------------------------------------------------------
// InMemoryResearchStore
// ---------------------------------------------------------------------------

/// Ids start at 1 and increase with each save.
#[derive(Default)]
pub struct InMemoryResearchStore {
    records: Mutex<Vec<ResearchRecord>>,
}

impl InMemoryResearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResearchStore for InMemoryResearchStore {
    async fn save_research(&self, record: &ResearchRecord) -> Result<i64> {
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        Ok(records.len() as i64)
    }

    async fn find_research(&self, id: i64) -> Result<Option<ResearchRecord>> {
        let records = self.records.lock().unwrap();
        let record = usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| records.get(index).cloned());
        Ok(record)
    }
}
