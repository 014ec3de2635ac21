pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod prompt;
pub mod resolver;
pub mod service;
pub mod sources;
pub mod summarizer;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod types;

pub use config::{Config, LlmProvider, ResearchSettings};
pub use context::ContextBuilder;
pub use error::{FetchFailure, ResearchError};
pub use fetcher::{FetchOptions, HttpPageFetcher};
pub use resolver::NameResolver;
pub use service::Researcher;
pub use summarizer::ResearchSummarizer;
pub use traits::{CatalogService, PageFetcher, ResearchStore};
pub use types::{
    CatalogFacts, Confidence, PageContent, ResearchContext, ResearchRecord, ResearchRequest,
    ResearchSummary, ResolvedName,
};
