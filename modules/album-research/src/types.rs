use serde::{Deserialize, Serialize};

use crate::error::ResearchError;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A validated (artist, album) pair. Construction fails before any network
/// activity when either name is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchRequest {
    artist: String,
    album: String,
}

impl ResearchRequest {
    pub fn new(artist: &str, album: &str) -> Result<Self, ResearchError> {
        let artist = artist.trim();
        let album = album.trim();
        if artist.is_empty() || album.is_empty() {
            return Err(ResearchError::Validation(
                "artist name and album name are both required".to_string(),
            ));
        }
        Ok(Self {
            artist: artist.to_string(),
            album: album.to_string(),
        })
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    pub original: String,
    pub resolved: String,
}

impl ResolvedName {
    pub fn unchanged(name: &str) -> Self {
        Self {
            original: name.to_string(),
            resolved: name.to_string(),
        }
    }

    pub fn was_translated(&self) -> bool {
        self.original != self.resolved
    }
}

// ---------------------------------------------------------------------------
// Catalog facts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistFacts {
    pub name: String,
    pub kind: Option<String>,
    pub country: Option<String>,
    pub active_from: Option<String>,
    /// At most five, most popular first.
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseFacts {
    pub title: String,
    pub date: Option<String>,
    pub kind: Option<String>,
    pub label: Option<String>,
    pub track_count: u32,
    /// Titles in track-position order.
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogFacts {
    pub artist: Option<ArtistFacts>,
    pub release: Option<ReleaseFacts>,
}

impl CatalogFacts {
    pub fn is_empty(&self) -> bool {
        self.artist.is_none() && self.release.is_none()
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Extracted plain text of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub url: String,
    pub content: String,
}

/// A review-aggregator search page to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSiteUrl {
    pub site: &'static str,
    pub url: String,
}

/// A review-aggregator page that was fetched and extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewExcerpt {
    pub site: &'static str,
    pub page: PageContent,
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The merged document handed to the summarizer, plus attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchContext {
    pub artist: ResolvedName,
    pub album: String,
    pub text: String,
    /// Catalog id (if matched), then encyclopedia URLs, then review URLs.
    pub sources: Vec<String>,
    /// True when the thin-data notice was appended.
    pub thin_data: bool,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    #[default]
    Low,
}

impl Confidence {
    /// Exact match on the three wire values; anything else is `Low`.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("high") => Confidence::High,
            Some("medium") => Confidence::Medium,
            _ => Confidence::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Validated model output. Text fields are trimmed, capped, and never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResearchSummary {
    pub genre: Option<String>,
    pub artist_bio: Option<String>,
    pub album_summary: Option<String>,
    pub user_opinions: Option<String>,
    pub key_themes: Option<String>,
    pub confidence: Confidence,
}

impl ResearchSummary {
    /// At least one of genre, artist bio, or album summary survived validation.
    pub fn has_core_content(&self) -> bool {
        self.genre.is_some() || self.artist_bio.is_some() || self.album_summary.is_some()
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// The persistable result of one research request. Identity and timestamps
/// are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub artist_name: String,
    pub album_name: String,
    pub genre: Option<String>,
    pub artist_bio: Option<String>,
    pub album_summary: Option<String>,
    pub user_opinions: Option<String>,
    pub key_themes: Option<String>,
    pub sources: Vec<String>,
    pub confidence: Confidence,
}

impl ResearchRecord {
    pub fn new(request: &ResearchRequest, context: &ResearchContext, summary: ResearchSummary) -> Self {
        Self {
            artist_name: request.artist().to_string(),
            album_name: request.album().to_string(),
            genre: summary.genre,
            artist_bio: summary.artist_bio,
            album_summary: summary.album_summary,
            user_opinions: summary.user_opinions,
            key_themes: summary.key_themes,
            sources: context.sources.clone(),
            confidence: summary.confidence,
        }
    }
}
