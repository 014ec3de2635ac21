use serde::{Deserialize, Deserializer};

// ============================================================================
// Search envelopes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchResponse {
    #[serde(default)]
    pub artists: Vec<ArtistMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseSearchResponse {
    #[serde(default)]
    pub releases: Vec<Release>,
}

// ============================================================================
// Artists
// ============================================================================

/// One fuzzy-search hit. `score` is the service's 0-100 match score.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistMatch {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "score_from_number_or_string")]
    pub score: u8,
    #[serde(rename = "sort-name")]
    pub sort_name: Option<String>,
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alias {
    pub name: String,
    pub locale: Option<String>,
    #[serde(rename = "type")]
    pub alias_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub artist_type: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "life-span")]
    pub life_span: Option<LifeSpan>,
    /// `None` when the response carried no `tags` key at all.
    pub tags: Option<Vec<Tag>>,
    pub genres: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LifeSpan {
    pub begin: Option<String>,
    pub end: Option<String>,
    pub ended: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub count: i64,
}

// ============================================================================
// Releases
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "label-info", default)]
    pub label_info: Vec<LabelInfo>,
    #[serde(rename = "release-group")]
    pub release_group: Option<ReleaseGroup>,
    #[serde(rename = "artist-credit", default)]
    pub artist_credit: Vec<ArtistCredit>,
    #[serde(default)]
    pub media: Vec<Medium>,
}

impl Release {
    /// Id of the first credited artist, if the release names one.
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artist_credit
            .first()
            .map(|credit| credit.artist.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelInfo {
    pub label: Option<Label>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseGroup {
    pub id: String,
    pub title: Option<String>,
    #[serde(rename = "primary-type")]
    pub primary_type: Option<String>,
    #[serde(rename = "secondary-types", default)]
    pub secondary_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistCredit {
    pub name: Option<String>,
    pub artist: CreditedArtist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditedArtist {
    pub id: String,
    pub name: String,
    #[serde(rename = "sort-name")]
    pub sort_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Medium {
    #[serde(rename = "track-count", default)]
    pub track_count: u32,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub title: String,
    #[serde(default)]
    pub position: u32,
    pub length: Option<u64>,
}

/// Search scores arrive as integers from the JSON API but as strings from
/// older mirrors; accept both.
fn score_from_number_or_string<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(u64),
        Text(String),
    }

    let score = match Score::deserialize(deserializer)? {
        Score::Number(n) => n,
        Score::Text(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
    };
    Ok(score.min(100) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accepts_number_and_string() {
        let numeric: ArtistMatch =
            serde_json::from_str(r#"{"id": "a", "name": "BTS", "score": 100}"#).unwrap();
        assert_eq!(numeric.score, 100);

        let text: ArtistMatch =
            serde_json::from_str(r#"{"id": "a", "name": "BTS", "score": "87"}"#).unwrap();
        assert_eq!(text.score, 87);

        let missing: ArtistMatch = serde_json::from_str(r#"{"id": "a", "name": "BTS"}"#).unwrap();
        assert_eq!(missing.score, 0);
    }

    #[test]
    fn test_release_tolerates_sparse_payload() {
        let release: Release =
            serde_json::from_str(r#"{"id": "r1", "title": "OK Computer"}"#).unwrap();
        assert!(release.media.is_empty());
        assert!(release.label_info.is_empty());
        assert_eq!(release.primary_artist_id(), None);
    }

    #[test]
    fn test_artist_distinguishes_missing_tags_from_empty() {
        let without: Artist =
            serde_json::from_str(r#"{"id": "x", "name": "Radiohead", "genres": []}"#).unwrap();
        assert!(without.tags.is_none());
        assert_eq!(without.genres.as_ref().map(Vec::len), Some(0));

        let with_empty: Artist =
            serde_json::from_str(r#"{"id": "x", "name": "Radiohead", "tags": []}"#).unwrap();
        assert_eq!(with_empty.tags.as_ref().map(Vec::len), Some(0));
    }
}
