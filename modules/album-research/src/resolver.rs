//! Cross-script artist name resolution.
//!
//! Names written in Hangul are looked up in the catalog, which indexes
//! localized aliases, and replaced with the catalog's canonical name when the
//! top match is confident enough. Everything else passes through untouched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::traits::CatalogService;
use crate::types::ResolvedName;

/// Minimum catalog match score (0-100) for accepting a canonical name.
pub const DEFAULT_MATCH_THRESHOLD: u8 = 80;

const CANDIDATE_LIMIT: u32 = 3;

/// Hangul syllables, Hangul Jamo, or Hangul Compatibility Jamo.
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
    })
}

pub struct NameResolver {
    catalog: Arc<dyn CatalogService>,
    threshold: u8,
}

impl NameResolver {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Never fails: search errors count as "no candidates".
    pub async fn resolve(&self, name: &str) -> ResolvedName {
        if !contains_hangul(name) {
            return ResolvedName::unchanged(name);
        }

        let candidates = match self.catalog.search_artists(name, CANDIDATE_LIMIT).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(name, error = %e, "Artist name search failed, keeping original");
                return ResolvedName::unchanged(name);
            }
        };

        let Some(best) = candidates.first() else {
            debug!(name, "No catalog candidates for artist name");
            return ResolvedName::unchanged(name);
        };

        if best.score < self.threshold {
            debug!(
                name,
                candidate = best.name.as_str(),
                score = best.score,
                threshold = self.threshold,
                "Top candidate below threshold"
            );
            return ResolvedName::unchanged(name);
        }

        info!(original = name, resolved = best.name.as_str(), score = best.score, "Resolved artist name");
        ResolvedName {
            original: name.to_string(),
            resolved: best.name.clone(),
        }
    }
}
