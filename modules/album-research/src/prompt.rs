//! Prompt text for the research summarizer, plus the research reference block
//! that review-feedback prompts embed.

use crate::types::{ResearchContext, ResearchRecord};

/// Bump whenever the system prompt or the expected JSON shape changes.
pub const RESEARCH_PROMPT_VERSION: &str = "research-v1";

pub fn research_system_prompt(language: &str) -> String {
    format!(
        r#"You are a music researcher with deep knowledge of the music industry.

## Role
Combine the supplied material (MusicBrainz metadata, Wikipedia text, review-site pages) with your own knowledge to write a thorough and accurate research summary of the album and its artist. Write every field in {language}.

## Principles
1. Facts first: use structured MusicBrainz data (release date, tracklist, label) exactly as given.
2. Fill gaps: add musical context missing from the material (the album's place in music history, genre traits, critical standing) from your own knowledge.
3. No invention: do not guess specific figures such as sales, chart positions or exact dates. Leave the field out or say the information is unavailable.
4. Local context: for Korean artists, reflect the Korean market (music shows, charts, fandom).
5. Review sites: if Metacritic, Album of the Year or Rate Your Music scores or reviews were collected, use them in userOpinions.

## Response format
Respond with JSON only. No text outside the JSON and no code fences.

{{
  "genre": "genres/styles, comma separated",
  "artistBio": "artist background in 4-6 sentences: debut, key works, musical traits, influences",
  "albumSummary": "album overview in 4-6 sentences: release date, track count, concept, producers and collaborators, lead singles; build on MusicBrainz data when present",
  "userOpinions": "critical and public reception in 3-5 sentences; include collected Metacritic/AOTY/RYM scores; say that exact scores need checking if unsure",
  "keyThemes": "3-5 core musical traits or themes, comma separated",
  "confidence": "high, medium or low: overall reliability of this response given the material and your knowledge"
}}"#
    )
}

pub fn research_user_message(context: &ResearchContext) -> String {
    format!(
        "Write the album research summary as JSON from the collected material below.\n\n{}",
        context.text
    )
}

/// Reference block for review-feedback prompts. Absent fields are skipped.
pub fn render_research_reference(record: &ResearchRecord) -> String {
    let mut lines = vec![
        "## Album research (reference)".to_string(),
        format!("- Artist: {}", record.artist_name),
        format!("- Album: {}", record.album_name),
    ];

    let fields = [
        ("Genre", &record.genre),
        ("Artist background", &record.artist_bio),
        ("Album overview", &record.album_summary),
        ("Listener reception", &record.user_opinions),
        ("Key themes", &record.key_themes),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("- {label}: {value}"));
        }
    }

    lines.push(String::new());
    lines.push(
        "Use this research to point out anything important the reviewer missed.".to_string(),
    );
    lines.join("\n")
}
