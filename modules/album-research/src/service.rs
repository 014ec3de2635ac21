use std::sync::Arc;

use ai_client::{Claude, Gemini, TextGenerator};
use anyhow::Result;
use musicbrainz_client::MusicBrainzClient;
use tracing::info;

use crate::config::{Config, LlmProvider};
use crate::context::ContextBuilder;
use crate::error::ResearchError;
use crate::fetcher::HttpPageFetcher;
use crate::summarizer::ResearchSummarizer;
use crate::types::{ResearchRecord, ResearchRequest};

/// End-to-end research for one (artist, album) pair: validate, collect
/// context, summarize. Persisting the record is left to the caller's
/// `ResearchStore`.
pub struct Researcher {
    builder: ContextBuilder,
    summarizer: ResearchSummarizer,
}

impl Researcher {
    pub fn new(builder: ContextBuilder, summarizer: ResearchSummarizer) -> Self {
        Self { builder, summarizer }
    }

    /// Production wiring: MusicBrainz, plain HTTP pages, and the configured
    /// model provider.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = Arc::new(MusicBrainzClient::new(&config.musicbrainz_user_agent)?);
        let fetcher = Arc::new(HttpPageFetcher::new());

        let generator: Arc<dyn TextGenerator> = match config.llm_provider {
            LlmProvider::Gemini => Arc::new(Gemini::new(&config.llm_api_key, &config.llm_model)),
            LlmProvider::Claude => Arc::new(Claude::new(&config.llm_api_key, &config.llm_model)),
        };

        Ok(Self::new(
            ContextBuilder::new(catalog, fetcher, config.research.clone()),
            ResearchSummarizer::new(generator, config.research.summary_language.clone()),
        ))
    }

    pub async fn research(&self, artist: &str, album: &str) -> Result<ResearchRecord, ResearchError> {
        let request = ResearchRequest::new(artist, album)?;

        let context = self.builder.build(&request).await;
        let summary = self.summarizer.summarize(&context).await?;
        let record = ResearchRecord::new(&request, &context, summary);

        info!(
            artist = record.artist_name.as_str(),
            album = record.album_name.as_str(),
            sources = record.sources.len(),
            confidence = record.confidence.as_str(),
            "Research complete"
        );
        Ok(record)
    }
}
