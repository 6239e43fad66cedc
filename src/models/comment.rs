use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder written for comments whose author account no longer exists.
pub const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Positive => "POSITIVE",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    Pricing,
    Competitor,
    Complaint,
    Praise,
    FeatureRequest,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::Pricing,
        Tag::Competitor,
        Tag::Complaint,
        Tag::Praise,
        Tag::FeatureRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Pricing => "PRICING",
            Tag::Competitor => "COMPETITOR",
            Tag::Complaint => "COMPLAINT",
            Tag::Praise => "PRAISE",
            Tag::FeatureRequest => "FEATURE_REQUEST",
        }
    }

    /// When the tag applies, phrased for the tagging prompt.
    pub fn criteria(&self) -> &'static str {
        match self {
            Tag::Pricing => "Comment mentions pricing of the product",
            Tag::Competitor => "Comment mentions a competitor of the product",
            Tag::Complaint => "Comment is a complaint of the product",
            Tag::Praise => "Comment praises the product in any way",
            Tag::FeatureRequest => {
                "Comment is requesting a feature the author wishes the product has."
            }
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero or more vocabulary tags, kept in the order the classifier gave them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(Tag::as_str).collect();
        f.write_str(&labels.join(","))
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut tags = TagSet::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

/// One annotated comment, as written to the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub thread_url: String,
    pub comment_id: String,
    pub parent_id: String,
    pub author: String,
    pub text: String,
    pub sentiment: Sentiment,
    pub tags: TagSet,
    pub post_date: NaiveDate,
}

impl CommentRecord {
    pub const HEADER: [&'static str; 8] = [
        "reddit_url",
        "comment_id",
        "comment_parent_id",
        "comment_author",
        "comment_text",
        "sentiment",
        "tags",
        "post_date",
    ];

    /// Cells in header order.
    pub fn to_row(&self) -> [String; 8] {
        [
            self.thread_url.clone(),
            self.comment_id.clone(),
            self.parent_id.clone(),
            self.author.clone(),
            self.text.clone(),
            self.sentiment.to_string(),
            self.tags.to_string(),
            format_post_date(self.post_date),
        ]
    }
}

/// Calendar date (UTC) of an epoch timestamp in seconds.
pub fn post_date_from_epoch(created_utc: f64) -> Result<NaiveDate> {
    DateTime::from_timestamp(created_utc.floor() as i64, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| Error::MalformedThread(format!("timestamp out of range: {}", created_utc)))
}

pub fn format_post_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
