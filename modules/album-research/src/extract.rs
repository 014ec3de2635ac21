//! HTML → plain text.
//!
//! Two strategies, both pure and deterministic:
//! - [`extract_encyclopedia_text`] keeps only paragraph blocks, which drops
//!   navigation, infobox and footer noise on encyclopedia pages.
//! - [`extract_page_text`] handles arbitrary pages: scripts and styles are
//!   removed first, paragraphs are preferred, and when a page has too little
//!   paragraph markup the whole document is flattened instead.

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const ENCYCLOPEDIA_MAX_CHARS: usize = 5000;
/// Below this an encyclopedia page counts as a failed fetch.
pub const ENCYCLOPEDIA_MIN_CHARS: usize = 100;
const ENCYCLOPEDIA_MIN_PARAGRAPH: usize = 30;

pub const PAGE_MAX_CHARS: usize = 4000;
/// Below this a generic page counts as a failed fetch.
pub const PAGE_MIN_CHARS: usize = 50;
const PAGE_MIN_PARAGRAPH: usize = 20;
/// Paragraph text (space-joined) must exceed this to win over flattening.
const PAGE_PARAGRAPH_FLOOR: usize = 200;

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<p(?:\s[^>]*)?>([\s\S]*?)</p\s*>").expect("valid regex")
});
static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script(?:\s[^>]*)?>[\s\S]*?</script\s*>").expect("valid regex")
});
static STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<style(?:\s[^>]*)?>[\s\S]*?</style\s*>").expect("valid regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(nbsp|amp|lt|gt|quot|#[0-9]+|#[xX][0-9a-fA-F]+);").expect("valid regex")
});
static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));
/// Unambiguous HTML: closing tags, comments/doctypes, void elements, or an
/// opening tag carrying an attribute. Bare `<` and `>` in prose never match.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</[a-z][a-z0-9-]*\s*>|<!(?:--|[a-z])|<(?:br|hr|img|meta|link|input)\b[^>]*>|<[a-z][a-z0-9-]*\s+[a-z-]+\s*=[^>]*>",
    )
    .expect("valid regex")
});

/// Paragraph text of an encyclopedia article, citation markers removed,
/// paragraphs of 30 chars or fewer dropped, capped at 5000 chars.
///
/// HTML contributes `<p>` blocks only; a document with markup but no
/// paragraphs yields an empty string. Input with no markup at all is taken
/// as already-extracted text (paragraphs separated by blank lines) and is
/// neither tag-stripped nor entity-decoded, so the function is idempotent on
/// its own output.
pub fn extract_encyclopedia_text(html: &str) -> String {
    let paragraphs: Vec<String> = if MARKUP.is_match(html) {
        PARAGRAPH
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).map(|m| clean_fragment(m.as_str(), true)))
            .filter(|text| text.chars().count() > ENCYCLOPEDIA_MIN_PARAGRAPH)
            .collect()
    } else {
        BLANK_LINE
            .split(html)
            .map(clean_text_block)
            .filter(|text| text.chars().count() > ENCYCLOPEDIA_MIN_PARAGRAPH)
            .collect()
    };

    cap_paragraphs(&paragraphs.join("\n\n"), ENCYCLOPEDIA_MAX_CHARS, ENCYCLOPEDIA_MIN_PARAGRAPH)
}

/// Best-effort text of an arbitrary page, capped at 4000 chars.
pub fn extract_page_text(html: &str) -> String {
    let without_scripts = SCRIPT.replace_all(html, "");
    let cleaned = STYLE.replace_all(&without_scripts, "");

    let paragraphs: Vec<String> = PARAGRAPH
        .captures_iter(&cleaned)
        .filter_map(|caps| caps.get(1).map(|m| clean_fragment(m.as_str(), false)))
        .filter(|text| text.chars().count() > PAGE_MIN_PARAGRAPH)
        .collect();

    let joined_len: usize = paragraphs.iter().map(|p| p.chars().count()).sum::<usize>()
        + paragraphs.len().saturating_sub(1);
    if joined_len > PAGE_PARAGRAPH_FLOOR {
        return truncate_chars(&paragraphs.join("\n\n"), PAGE_MAX_CHARS).to_string();
    }

    let flattened = TAG.replace_all(&cleaned, " ");
    let decoded = decode_entities(&flattened);
    let collapsed = WHITESPACE.replace_all(&decoded, " ");
    truncate_chars(collapsed.trim(), PAGE_MAX_CHARS).to_string()
}

/// At most `max` chars of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn clean_fragment(fragment: &str, strip_citations: bool) -> String {
    let untagged = TAG.replace_all(fragment, "");
    let decoded = decode_entities(&untagged);
    let text = if strip_citations {
        CITATION.replace_all(&decoded, "").into_owned()
    } else {
        decoded
    };
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Already-extracted text: citations removed, whitespace collapsed. No tag
/// stripping or decoding, since `<`, `>` and `&` here are literal.
fn clean_text_block(block: &str) -> String {
    let text = CITATION.replace_all(block, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Truncate joined paragraphs to `max` chars. A trailing fragment that the
/// cut leaves at `min_paragraph` chars or fewer is dropped along with its
/// separator, so re-extraction does not shorten the result further.
fn cap_paragraphs(text: &str, max: usize, min_paragraph: usize) -> String {
    let capped = truncate_chars(text, max).trim_end();
    if capped.len() == text.len() {
        return capped.to_string();
    }
    match capped.rsplit_once("\n\n") {
        Some((head, tail)) if tail.chars().count() <= min_paragraph => head.to_string(),
        None if capped.chars().count() <= min_paragraph => String::new(),
        _ => capped.to_string(),
    }
}

/// Single-pass decode of the common named entities and numeric references.
/// Unknown or invalid references are left untouched.
fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "nbsp" => Some(' '),
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                _ => numeric_reference(name),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_reference(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code).filter(|c| *c != '\0')
}
