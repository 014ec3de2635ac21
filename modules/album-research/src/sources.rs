//! Page sources: where to look, and how a fetched page becomes an excerpt.

use tracing::debug;

use crate::error::FetchFailure;
use crate::extract::{
    extract_encyclopedia_text, extract_page_text, ENCYCLOPEDIA_MIN_CHARS, PAGE_MIN_CHARS,
};
use crate::fetcher::FetchOptions;
use crate::traits::PageFetcher;
use crate::types::{PageContent, ReviewSiteUrl};

pub const METACRITIC: &str = "Metacritic";
pub const ALBUM_OF_THE_YEAR: &str = "Album of the Year";
pub const RATE_YOUR_MUSIC: &str = "Rate Your Music";

/// Search pages on the three review aggregators, in fixed order.
pub fn review_site_urls(artist: &str, album: &str) -> Vec<ReviewSiteUrl> {
    let q = urlencoding::encode(&format!("{artist} {album}")).into_owned();
    vec![
        ReviewSiteUrl {
            site: METACRITIC,
            url: format!("https://www.metacritic.com/search/{q}/?page=1&category=2"),
        },
        ReviewSiteUrl {
            site: ALBUM_OF_THE_YEAR,
            url: format!("https://www.albumoftheyear.org/search/albums/?q={q}"),
        },
        ReviewSiteUrl {
            site: RATE_YOUR_MUSIC,
            url: format!("https://rateyourmusic.com/search?searchterm={q}&searchtype=l"),
        },
    ]
}

/// Article URL for `title` on the `lang` edition.
pub fn wikipedia_url(lang: &str, title: &str) -> String {
    format!(
        "https://{lang}.wikipedia.org/wiki/{}",
        urlencoding::encode(&title.replace(' ', "_"))
    )
}

pub async fn fetch_encyclopedia_page(
    fetcher: &dyn PageFetcher,
    url: &str,
    options: &FetchOptions,
) -> Result<PageContent, FetchFailure> {
    fetch_and_extract(fetcher, url, options, extract_encyclopedia_text, ENCYCLOPEDIA_MIN_CHARS).await
}

pub async fn fetch_review_site(
    fetcher: &dyn PageFetcher,
    url: &str,
    options: &FetchOptions,
) -> Result<PageContent, FetchFailure> {
    fetch_and_extract(fetcher, url, options, extract_page_text, PAGE_MIN_CHARS).await
}

async fn fetch_and_extract(
    fetcher: &dyn PageFetcher,
    url: &str,
    options: &FetchOptions,
    extract: fn(&str) -> String,
    min_chars: usize,
) -> Result<PageContent, FetchFailure> {
    let html = fetcher.fetch(url, options).await?;
    let content = extract(&html);

    let chars = content.chars().count();
    if chars < min_chars {
        return Err(FetchFailure::InsufficientContent { chars, min: min_chars });
    }

    debug!(url, html_bytes = html.len(), chars, "Extracted page text");
    Ok(PageContent {
        url: url.to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    #[test]
    fn test_review_site_urls_encode_query() {
        let urls = review_site_urls("Radiohead", "OK Computer");
        let sites: Vec<_> = urls.iter().map(|u| u.site).collect();
        assert_eq!(sites, vec![METACRITIC, ALBUM_OF_THE_YEAR, RATE_YOUR_MUSIC]);
        assert_eq!(
            urls[0].url,
            "https://www.metacritic.com/search/Radiohead%20OK%20Computer/?page=1&category=2"
        );
        assert_eq!(
            urls[1].url,
            "https://www.albumoftheyear.org/search/albums/?q=Radiohead%20OK%20Computer"
        );
        assert_eq!(
            urls[2].url,
            "https://rateyourmusic.com/search?searchterm=Radiohead%20OK%20Computer&searchtype=l"
        );
    }

    #[test]
    fn test_review_site_urls_escape_reserved_characters() {
        let urls = review_site_urls("BTS", "Map of the Soul: 7");
        assert_eq!(
            urls[1].url,
            "https://www.albumoftheyear.org/search/albums/?q=BTS%20Map%20of%20the%20Soul%3A%207"
        );
    }

    #[test]
    fn test_wikipedia_url() {
        assert_eq!(
            wikipedia_url("en", "OK Computer (album)"),
            "https://en.wikipedia.org/wiki/OK_Computer_%28album%29"
        );
        assert_eq!(
            wikipedia_url("ko", "방탄소년단"),
            "https://ko.wikipedia.org/wiki/%EB%B0%A9%ED%83%84%EC%86%8C%EB%85%84%EB%8B%A8"
        );
    }

    #[tokio::test]
    async fn test_short_encyclopedia_page_is_a_failure() {
        let url = "https://en.wikipedia.org/wiki/Stub";
        let fetcher = MockFetcher::new()
            .on_page(url, "<p>A stub article that is only a little longer than thirty.</p>");

        let result = fetch_encyclopedia_page(&fetcher, url, &FetchOptions::encyclopedia()).await;
        assert_eq!(
            result,
            Err(FetchFailure::InsufficientContent { chars: 56, min: ENCYCLOPEDIA_MIN_CHARS })
        );
    }

    #[tokio::test]
    async fn test_encyclopedia_page_without_paragraphs_is_a_failure() {
        let url = "https://en.wikipedia.org/wiki/Special:Random";
        let fetcher = MockFetcher::new().on_page(
            url,
            r#"<html><body><script>var trackingConfiguration = { enabled: true, endpoint: 'https://stats.example/collect' };</script>
            <div id="nav">Main page Contents Current events Random article About Wikipedia Contact us</div></body></html>"#,
        );

        let result = fetch_encyclopedia_page(&fetcher, url, &FetchOptions::encyclopedia()).await;
        assert_eq!(
            result,
            Err(FetchFailure::InsufficientContent { chars: 0, min: ENCYCLOPEDIA_MIN_CHARS })
        );
    }

    #[tokio::test]
    async fn test_review_page_extracted() {
        let url = "https://www.albumoftheyear.org/search/albums/?q=x";
        let fetcher = MockFetcher::new().on_page(
            url,
            "<ul><li>Radiohead - OK Computer</li><li>1997</li><li>Critic score 95, user score 91</li></ul>",
        );

        let page = fetch_review_site(&fetcher, url, &FetchOptions::browser()).await.unwrap();
        assert_eq!(page.url, url);
        assert_eq!(page.content, "Radiohead - OK Computer 1997 Critic score 95, user score 91");
    }

    #[tokio::test]
    async fn test_fetch_failure_passes_through() {
        let fetcher = MockFetcher::new().on_failure("https://rateyourmusic.com/x", FetchFailure::Status(403));
        let result =
            fetch_review_site(&fetcher, "https://rateyourmusic.com/x", &FetchOptions::browser()).await;
        assert_eq!(result, Err(FetchFailure::Status(403)));
    }
}
