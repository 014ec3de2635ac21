//! Catalog facts: the structured, highest-trust part of a research context.
//!
//! Two dependent catalog calls (release search, then artist lookup for the
//! release's first credited artist). Any failure degrades to missing facts.

use musicbrainz_client::{Artist, Release, Tag};
use tracing::{debug, info, warn};

use crate::traits::CatalogService;
use crate::types::{ArtistFacts, CatalogFacts, ReleaseFacts};

/// Source-list entry recorded when the catalog contributed any facts.
pub const CATALOG_SOURCE_ID: &str = "musicbrainz.org";

pub const MAX_ARTIST_TAGS: usize = 5;

pub async fn fetch_catalog_facts(catalog: &dyn CatalogService, artist: &str, album: &str) -> CatalogFacts {
    let release = match catalog.search_release(album, artist).await {
        Ok(release) => release,
        Err(e) => {
            warn!(artist, album, error = %e, "Release search failed");
            None
        }
    };

    let Some(release) = release else {
        debug!(artist, album, "No catalog release matched");
        return CatalogFacts::default();
    };

    let artist_facts = match release.primary_artist_id() {
        Some(artist_id) => match catalog.lookup_artist(artist_id).await {
            Ok(found) => Some(artist_facts(&found)),
            Err(e) => {
                warn!(artist_id, error = %e, "Artist lookup failed");
                None
            }
        },
        None => None,
    };

    let facts = CatalogFacts {
        artist: artist_facts,
        release: Some(release_facts(&release)),
    };
    info!(
        release_id = release.id.as_str(),
        has_artist = facts.artist.is_some(),
        "Catalog facts collected"
    );
    facts
}

pub fn artist_facts(artist: &Artist) -> ArtistFacts {
    ArtistFacts {
        name: artist.name.clone(),
        kind: artist.artist_type.clone(),
        country: artist.country.clone(),
        active_from: artist.life_span.as_ref().and_then(|span| span.begin.clone()),
        tags: top_tags(artist),
    }
}

/// Tags when the artist has any, otherwise genres. Most-counted first, ties
/// keep catalog order.
fn top_tags(artist: &Artist) -> Vec<String> {
    let mut ranked: Vec<&Tag> = match (&artist.tags, &artist.genres) {
        (Some(tags), _) if !tags.is_empty() => tags.iter().collect(),
        (_, Some(genres)) => genres.iter().collect(),
        _ => Vec::new(),
    };
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
        .into_iter()
        .take(MAX_ARTIST_TAGS)
        .map(|tag| tag.name.clone())
        .collect()
}

pub fn release_facts(release: &Release) -> ReleaseFacts {
    let first_medium = release.media.first();

    let mut tracks: Vec<_> = first_medium
        .map(|medium| medium.tracks.iter().collect())
        .unwrap_or_default();
    tracks.sort_by_key(|track| track.position);

    ReleaseFacts {
        title: release.title.clone(),
        date: release.date.clone(),
        kind: release
            .release_group
            .as_ref()
            .and_then(|group| group.primary_type.clone()),
        label: release
            .label_info
            .first()
            .and_then(|info| info.label.as_ref())
            .map(|label| label.name.clone()),
        track_count: first_medium.map_or(0, |medium| medium.track_count),
        tracks: tracks.into_iter().map(|track| track.title.clone()).collect(),
    }
}

/// Labelled lines for the "confirmed facts" section. Empty when there are no
/// facts.
pub fn format_catalog_facts(facts: &CatalogFacts) -> String {
    let mut blocks = Vec::new();

    if let Some(artist) = &facts.artist {
        let mut lines = vec![
            "## Artist (MusicBrainz)".to_string(),
            format!("- Name: {}", artist.name),
        ];
        if let Some(kind) = &artist.kind {
            lines.push(format!("- Type: {kind}"));
        }
        if let Some(country) = &artist.country {
            lines.push(format!("- Country: {country}"));
        }
        if let Some(active_from) = &artist.active_from {
            lines.push(format!("- Active since: {active_from}"));
        }
        if !artist.tags.is_empty() {
            lines.push(format!("- Tags: {}", artist.tags.join(", ")));
        }
        blocks.push(lines.join("\n"));
    }

    if let Some(release) = &facts.release {
        let mut lines = vec![
            "## Album (MusicBrainz)".to_string(),
            format!("- Title: {}", release.title),
        ];
        if let Some(date) = &release.date {
            lines.push(format!("- Release date: {date}"));
        }
        if let Some(kind) = &release.kind {
            lines.push(format!("- Type: {kind}"));
        }
        if let Some(label) = &release.label {
            lines.push(format!("- Label: {label}"));
        }
        lines.push(format!("- Track count: {}", release.track_count));
        if !release.tracks.is_empty() {
            lines.push("- Tracklist:".to_string());
            for (i, title) in release.tracks.iter().enumerate() {
                lines.push(format!("  {}. {title}", i + 1));
            }
        }
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCatalog;

    fn artist_json(body: &str) -> Artist {
        serde_json::from_str(body).unwrap()
    }

    fn release_json(body: &str) -> Release {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_tags_sorted_by_count_and_capped() {
        let artist = artist_json(
            r#"{"id": "a", "name": "Radiohead", "tags": [
                {"name": "rock", "count": 5},
                {"name": "alternative rock", "count": 12},
                {"name": "electronic", "count": 7},
                {"name": "british", "count": 7},
                {"name": "art rock", "count": 9},
                {"name": "experimental", "count": 1}
            ]}"#,
        );
        assert_eq!(
            artist_facts(&artist).tags,
            vec!["alternative rock", "art rock", "electronic", "british", "rock"]
        );
    }

    #[test]
    fn test_genres_used_when_tags_missing_or_empty() {
        let missing = artist_json(
            r#"{"id": "a", "name": "X", "genres": [{"name": "k-pop", "count": 3}, {"name": "dance-pop", "count": 4}]}"#,
        );
        assert_eq!(artist_facts(&missing).tags, vec!["dance-pop", "k-pop"]);

        let empty = artist_json(
            r#"{"id": "a", "name": "X", "tags": [], "genres": [{"name": "k-pop", "count": 3}]}"#,
        );
        assert_eq!(artist_facts(&empty).tags, vec!["k-pop"]);

        let both = artist_json(
            r#"{"id": "a", "name": "X", "tags": [{"name": "seen live", "count": 1}], "genres": [{"name": "k-pop", "count": 3}]}"#,
        );
        assert_eq!(artist_facts(&both).tags, vec!["seen live"]);
    }

    #[test]
    fn test_release_facts_order_tracks_by_position() {
        let release = release_json(
            r#"{
                "id": "r1", "title": "OK Computer", "date": "1997-05-21",
                "label-info": [{"label": {"name": "Parlophone"}}, {"label": {"name": "Capitol"}}],
                "release-group": {"id": "g1", "primary-type": "Album"},
                "media": [
                    {"track-count": 3, "tracks": [
                        {"title": "Paranoid Android", "position": 2},
                        {"title": "Airbag", "position": 1},
                        {"title": "Subterranean Homesick Alien", "position": 3}
                    ]},
                    {"track-count": 1, "tracks": [{"title": "Bonus", "position": 1}]}
                ]
            }"#,
        );
        let facts = release_facts(&release);
        assert_eq!(facts.label.as_deref(), Some("Parlophone"));
        assert_eq!(facts.kind.as_deref(), Some("Album"));
        assert_eq!(facts.track_count, 3);
        assert_eq!(
            facts.tracks,
            vec!["Airbag", "Paranoid Android", "Subterranean Homesick Alien"]
        );
    }

    #[test]
    fn test_release_facts_without_media() {
        let facts = release_facts(&release_json(r#"{"id": "r1", "title": "Untitled"}"#));
        assert_eq!(facts.track_count, 0);
        assert!(facts.tracks.is_empty());
        assert_eq!(facts.label, None);
    }

    #[test]
    fn test_format_is_empty_without_facts() {
        assert_eq!(format_catalog_facts(&CatalogFacts::default()), "");
    }

    #[test]
    fn test_format_renders_labelled_lines() {
        let facts = CatalogFacts {
            artist: Some(ArtistFacts {
                name: "Radiohead".to_string(),
                kind: Some("Group".to_string()),
                country: Some("GB".to_string()),
                active_from: Some("1991".to_string()),
                tags: vec!["alternative rock".to_string(), "art rock".to_string()],
            }),
            release: Some(ReleaseFacts {
                title: "OK Computer".to_string(),
                date: None,
                kind: None,
                label: None,
                track_count: 2,
                tracks: vec!["Airbag".to_string(), "Paranoid Android".to_string()],
            }),
        };

        let text = format_catalog_facts(&facts);
        assert_eq!(
            text,
            "## Artist (MusicBrainz)\n\
             - Name: Radiohead\n\
             - Type: Group\n\
             - Country: GB\n\
             - Active since: 1991\n\
             - Tags: alternative rock, art rock\n\
             \n\
             ## Album (MusicBrainz)\n\
             - Title: OK Computer\n\
             - Track count: 2\n\
             - Tracklist:\n  \
             1. Airbag\n  \
             2. Paranoid Android"
        );
    }

    #[tokio::test]
    async fn test_no_release_skips_artist_lookup() {
        let catalog = MockCatalog::new();
        let facts = fetch_catalog_facts(&catalog, "Nobody", "Nothing").await;
        assert!(facts.is_empty());
        assert_eq!(catalog.release_searches(), vec![("Nothing".to_string(), "Nobody".to_string())]);
        assert!(catalog.artist_lookups().is_empty());
    }

    #[tokio::test]
    async fn test_release_without_credit_skips_artist_lookup() {
        let catalog = MockCatalog::new().on_release(
            "OK Computer",
            "Radiohead",
            release_json(r#"{"id": "r1", "title": "OK Computer"}"#),
        );
        let facts = fetch_catalog_facts(&catalog, "Radiohead", "OK Computer").await;
        assert!(facts.release.is_some());
        assert!(facts.artist.is_none());
        assert!(catalog.artist_lookups().is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_release_facts() {
        let catalog = MockCatalog::new().on_release(
            "OK Computer",
            "Radiohead",
            release_json(
                r#"{"id": "r1", "title": "OK Computer",
                    "artist-credit": [{"artist": {"id": "a74b1b7f", "name": "Radiohead"}}]}"#,
            ),
        );
        let facts = fetch_catalog_facts(&catalog, "Radiohead", "OK Computer").await;
        assert_eq!(catalog.artist_lookups(), vec!["a74b1b7f".to_string()]);
        assert!(facts.artist.is_none());
        assert_eq!(facts.release.map(|r| r.title), Some("OK Computer".to_string()));
    }

    #[tokio::test]
    async fn test_failing_catalog_yields_empty_facts() {
        let catalog = MockCatalog::new().failing();
        let facts = fetch_catalog_facts(&catalog, "Radiohead", "OK Computer").await;
        assert!(facts.is_empty());
    }
}
