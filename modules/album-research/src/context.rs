//! Research context assembly.
//!
//! One request fans out to the catalog, three encyclopedia articles and three
//! review-aggregator search pages. Every source is optional: failures are
//! logged and dropped, and when too little survives the context says so
//! explicitly instead of failing.
//!
//! Sections are ordered by trust: catalog facts, then aggregator pages, then
//! encyclopedia text, then the thin-data notice.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::catalog::{fetch_catalog_facts, format_catalog_facts, CATALOG_SOURCE_ID};
use crate::config::ResearchSettings;
use crate::error::FetchFailure;
use crate::extract::truncate_chars;
use crate::fetcher::FetchOptions;
use crate::resolver::NameResolver;
use crate::sources::{fetch_encyclopedia_page, fetch_review_site, review_site_urls, wikipedia_url};
use crate::traits::{CatalogService, PageFetcher};
use crate::types::{PageContent, ResearchContext, ResearchRequest, ResolvedName, ReviewExcerpt};

pub const REVIEW_EXCERPT_CHARS: usize = 2000;
pub const ENCYCLOPEDIA_EXCERPT_CHARS: usize = 3000;

/// Catalog text longer than this counts as substantial.
const SUBSTANTIAL_FACTS_CHARS: usize = 100;
/// An encyclopedia page longer than this counts as substantial.
const SUBSTANTIAL_PAGE_CHARS: usize = 200;

pub const CONFIRMED_FACTS_HEADING: &str = "# Confirmed facts (MusicBrainz database)";
pub const REVIEW_SITES_HEADING: &str = "# Music review sites";
pub const ENCYCLOPEDIA_HEADING: &str = "# Reference material (Wikipedia)";
pub const THIN_DATA_HEADING: &str = "# Data collection status";

const THIN_DATA_NOTICE: &str = "External sources did not return enough information. \
Use what you already know about this artist and album to write the summary, \
and mark anything you are not certain of as \"needs verification\".";

pub struct ContextBuilder {
    resolver: NameResolver,
    catalog: Arc<dyn CatalogService>,
    fetcher: Arc<dyn PageFetcher>,
    settings: ResearchSettings,
}

impl ContextBuilder {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        fetcher: Arc<dyn PageFetcher>,
        settings: ResearchSettings,
    ) -> Self {
        Self {
            resolver: NameResolver::new(catalog.clone()).with_threshold(settings.name_match_threshold),
            catalog,
            fetcher,
            settings,
        }
    }

    /// Never fails. The worst case is a header plus the thin-data notice and
    /// an empty source list.
    pub async fn build(&self, request: &ResearchRequest) -> ResearchContext {
        let album = request.album();
        let artist = self.resolver.resolve(request.artist()).await;

        info!(
            artist = artist.original.as_str(),
            resolved = artist.resolved.as_str(),
            album,
            "Collecting research sources"
        );

        let encyclopedia_urls = [
            wikipedia_url(&self.settings.primary_lang, &format!("{album} (album)")),
            wikipedia_url(&self.settings.primary_lang, &artist.resolved),
            wikipedia_url(&self.settings.secondary_lang, album),
        ];
        let review_targets = review_site_urls(&artist.resolved, album);

        let encyclopedia_options = FetchOptions::encyclopedia().with_timeout(self.settings.page_timeout);
        let browser_options = FetchOptions::browser().with_timeout(self.settings.page_timeout);
        let fetcher = self.fetcher.as_ref();

        // The catalog client spaces its own requests, so the facts lookup
        // queues behind the resolver's search while pages fetch immediately.
        let (facts, encyclopedia_results, review_results) = tokio::join!(
            fetch_catalog_facts(self.catalog.as_ref(), &artist.resolved, album),
            join_all(
                encyclopedia_urls
                    .iter()
                    .map(|url| fetch_encyclopedia_page(fetcher, url, &encyclopedia_options)),
            ),
            join_all(
                review_targets
                    .iter()
                    .map(|target| fetch_review_site(fetcher, &target.url, &browser_options)),
            ),
        );

        let pages: Vec<PageContent> = encyclopedia_urls
            .iter()
            .zip(encyclopedia_results)
            .filter_map(|(url, result)| keep_success("encyclopedia", url, result))
            .collect();

        let reviews: Vec<ReviewExcerpt> = review_targets
            .iter()
            .zip(review_results)
            .filter_map(|(target, result)| {
                keep_success(target.site, &target.url, result).map(|page| ReviewExcerpt {
                    site: target.site,
                    page,
                })
            })
            .collect();

        let mut sources = Vec::new();
        if !facts.is_empty() {
            sources.push(CATALOG_SOURCE_ID.to_string());
        }
        sources.extend(pages.iter().map(|page| page.url.clone()));
        sources.extend(reviews.iter().map(|review| review.page.url.clone()));

        let facts_text = format_catalog_facts(&facts);
        let (text, thin_data) = render_context(&artist, album, &facts_text, &reviews, &pages);

        info!(
            sources = sources.len(),
            encyclopedia_pages = pages.len(),
            review_pages = reviews.len(),
            thin_data,
            chars = text.chars().count(),
            "Research context built"
        );

        ResearchContext {
            artist,
            album: album.to_string(),
            text,
            sources,
            thin_data,
        }
    }
}

fn keep_success(source: &str, url: &str, result: Result<PageContent, FetchFailure>) -> Option<PageContent> {
    match result {
        Ok(page) => Some(page),
        Err(e) => {
            warn!(source, url, error = %e, "Source returned no data");
            None
        }
    }
}

/// Render the context document. Returns the text and whether the thin-data
/// notice was appended.
pub fn render_context(
    artist: &ResolvedName,
    album: &str,
    facts_text: &str,
    reviews: &[ReviewExcerpt],
    pages: &[PageContent],
) -> (String, bool) {
    let mut text = format!("# Research target\nArtist: {}\n", artist.original);
    if artist.was_translated() {
        text.push_str(&format!("Catalog name: {}\n", artist.resolved));
    }
    text.push_str(&format!("Album: {album}\n\n"));

    if !facts_text.is_empty() {
        text.push_str(&format!("{CONFIRMED_FACTS_HEADING}\n{facts_text}\n\n"));
    }

    if !reviews.is_empty() {
        text.push_str(REVIEW_SITES_HEADING);
        text.push('\n');
        for review in reviews {
            text.push_str(&format!(
                "## {} ({})\n{}\n\n",
                review.site,
                review.page.url,
                truncate_chars(&review.page.content, REVIEW_EXCERPT_CHARS)
            ));
        }
    }

    if !pages.is_empty() {
        text.push_str(ENCYCLOPEDIA_HEADING);
        text.push('\n');
        for page in pages {
            text.push_str(&format!(
                "## Source: {}\n{}\n\n",
                page.url,
                truncate_chars(&page.content, ENCYCLOPEDIA_EXCERPT_CHARS)
            ));
        }
    }

    let substantial = facts_text.chars().count() > SUBSTANTIAL_FACTS_CHARS
        || pages
            .iter()
            .any(|page| page.content.chars().count() > SUBSTANTIAL_PAGE_CHARS)
        || !reviews.is_empty();

    if !substantial {
        text.push_str(&format!("{THIN_DATA_HEADING}\n{THIN_DATA_NOTICE}\n\n"));
    }

    (text, !substantial)
}
