use crate::error::{Error, Result};
use crate::models::{Sentiment, Tag, TagSet};

/// Whitespace, wrapping quotes and a trailing period are tolerated; anything
/// else must be exactly one label.
pub fn parse_sentiment(response: &str) -> Result<Sentiment> {
    let cleaned = clean_label(response);

    match cleaned.to_ascii_uppercase().as_str() {
        "NEGATIVE" => Ok(Sentiment::Negative),
        "NEUTRAL" => Ok(Sentiment::Neutral),
        "POSITIVE" => Ok(Sentiment::Positive),
        _ => Err(Error::InvalidSentiment(response.to_string())),
    }
}

/// Comma or newline separated labels. An empty answer is a valid empty set,
/// an unknown label is an error.
pub fn parse_tags(response: &str) -> Result<TagSet> {
    let body = strip_tags_prefix(response.trim());

    let mut tags = TagSet::new();
    for piece in body.split([',', '\n']) {
        let label = clean_label(piece);
        if label.is_empty() {
            continue;
        }
        let tag = Tag::from_label(label).ok_or_else(|| Error::InvalidTag(label.to_string()))?;
        tags.insert(tag);
    }

    Ok(tags)
}

fn clean_label(text: &str) -> &str {
    text.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_end_matches('.')
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
}

// The tagging prompt ends with "Tags:", which models sometimes echo back.
fn strip_tags_prefix(text: &str) -> &str {
    match text.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("tags:") => text[5..].trim(),
        _ => text,
    }
}
