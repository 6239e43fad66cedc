//! Wire shapes of Reddit's listing JSON and their conversion into the
//! comment tree.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Comment, CommentNode, MorePlaceholder, DELETED_AUTHOR};

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub(crate) enum Thing {
    Listing(ListingData),
    #[serde(rename = "t1")]
    Comment(CommentData),
    #[serde(rename = "t3")]
    Link(LinkData),
    #[serde(rename = "more")]
    More(MoreData),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub(crate) children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentData {
    pub(crate) id: String,
    pub(crate) parent_id: String,
    #[serde(default)]
    pub(crate) author: Option<String>,
    #[serde(default)]
    pub(crate) body: String,
    pub(crate) created_utc: f64,
    #[serde(default)]
    pub(crate) replies: Replies,
}

/// Reddit sends `""` for a comment without replies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Replies {
    Listing(Box<Thing>),
    Empty(String),
}

impl Default for Replies {
    fn default() -> Self {
        Replies::Empty(String::new())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkData {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoreData {
    pub(crate) id: String,
    pub(crate) parent_id: String,
    #[serde(default)]
    pub(crate) count: u64,
    #[serde(default)]
    pub(crate) children: Vec<String>,
}

/// Envelope of `/api/morechildren?api_type=json`.
#[derive(Debug, Deserialize)]
pub(crate) struct MoreChildrenResponse {
    pub(crate) json: MoreChildrenJson,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoreChildrenJson {
    #[serde(default)]
    pub(crate) errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub(crate) data: Option<MoreChildrenData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoreChildrenData {
    #[serde(default)]
    pub(crate) things: Vec<Thing>,
}

impl Thing {
    pub(crate) fn into_listing_children(self) -> Result<Vec<Thing>> {
        match self {
            Thing::Listing(listing) => Ok(listing.children),
            other => Err(Error::MalformedThread(format!(
                "expected a listing, got {}",
                other.kind()
            ))),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Thing::Listing(_) => "Listing",
            Thing::Comment(_) => "t1",
            Thing::Link(_) => "t3",
            Thing::More(_) => "more",
        }
    }

    pub(crate) fn into_node(self) -> Result<CommentNode> {
        match self {
            Thing::Comment(data) => {
                let replies = match data.replies {
                    Replies::Listing(listing) => into_nodes(listing.into_listing_children()?)?,
                    Replies::Empty(_) => Vec::new(),
                };
                let author = data.author.filter(|a| a != DELETED_AUTHOR);

                Ok(CommentNode::Comment(Comment {
                    id: data.id,
                    parent_id: data.parent_id,
                    author,
                    body: data.body,
                    created_utc: data.created_utc,
                    replies,
                }))
            }
            Thing::More(data) => Ok(CommentNode::More(MorePlaceholder {
                id: data.id,
                parent_id: data.parent_id,
                count: data.count,
                children: data.children,
            })),
            other => Err(Error::MalformedThread(format!(
                "unexpected {} inside a comment tree",
                other.kind()
            ))),
        }
    }
}

pub(crate) fn into_nodes(things: Vec<Thing>) -> Result<Vec<CommentNode>> {
    things.into_iter().map(Thing::into_node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_replies_convert() {
        let value = json!({
            "kind": "t1",
            "data": {
                "id": "c1",
                "parent_id": "t3_abc",
                "author": "alice",
                "body": "too expensive",
                "created_utc": 1700000000.0,
                "replies": {
                    "kind": "Listing",
                    "data": {
                        "after": null,
                        "children": [
                            {"kind": "t1", "data": {
                                "id": "c2", "parent_id": "t1_c1", "author": "[deleted]",
                                "body": "[deleted]", "created_utc": 1700000100.0, "replies": ""
                            }},
                            {"kind": "more", "data": {
                                "id": "c3", "name": "t1_c3", "parent_id": "t1_c1",
                                "count": 2, "children": ["c3", "c4"], "depth": 1
                            }}
                        ]
                    }
                }
            }
        });

        let thing: Thing = serde_json::from_value(value).unwrap();
        let CommentNode::Comment(comment) = thing.into_node().unwrap() else {
            panic!("expected a comment");
        };

        assert_eq!(comment.author.as_deref(), Some("alice"));
        assert_eq!(comment.replies.len(), 2);
        match &comment.replies[0] {
            CommentNode::Comment(reply) => assert!(reply.author.is_none()),
            other => panic!("unexpected {:?}", other),
        }
        match &comment.replies[1] {
            CommentNode::More(more) => assert_eq!(more.children, vec!["c3", "c4"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_link_inside_tree_is_malformed() {
        let thing: Thing = serde_json::from_value(json!({
            "kind": "t3",
            "data": {"name": "t3_abc", "title": "x"}
        }))
        .unwrap();
        assert!(matches!(thing.into_node(), Err(Error::MalformedThread(_))));
    }
}
