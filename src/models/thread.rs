use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A submission and its comment tree, possibly still holding placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub url: String,
    /// Fullname of the submission, e.g. `t3_abc123`.
    pub link_id: String,
    pub title: Option<String>,
    pub comments: Vec<CommentNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CommentNode {
    Comment(Comment),
    More(MorePlaceholder),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub parent_id: String,
    pub author: Option<String>,
    pub body: String,
    pub created_utc: f64,
    pub replies: Vec<CommentNode>,
}

/// "load more comments" / "continue this thread" stand-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorePlaceholder {
    pub id: String,
    pub parent_id: String,
    pub count: u64,
    pub children: Vec<String>,
}

impl CommentNode {
    pub fn parent_id(&self) -> &str {
        match self {
            CommentNode::Comment(c) => &c.parent_id,
            CommentNode::More(m) => &m.parent_id,
        }
    }
}

impl Comment {
    pub fn fullname(&self) -> String {
        format!("t1_{}", self.id)
    }
}

impl MorePlaceholder {
    /// A placeholder without child ids stands for a reply chain that was cut
    /// for depth and has to be fetched from its parent comment.
    pub fn is_continue_thread(&self) -> bool {
        self.children.is_empty()
    }
}

impl Thread {
    /// Remove every placeholder from the tree, returning them in pre-order.
    pub fn take_placeholders(&mut self) -> Vec<MorePlaceholder> {
        let mut out = Vec::new();
        drain_placeholders(&mut self.comments, &mut out);
        out
    }

    pub fn placeholder_count(&self) -> usize {
        fn count(nodes: &[CommentNode]) -> usize {
            nodes
                .iter()
                .map(|n| match n {
                    CommentNode::More(_) => 1,
                    CommentNode::Comment(c) => count(&c.replies),
                })
                .sum()
        }
        count(&self.comments)
    }

    /// Attach fetched nodes under their parents. Nodes may reference each
    /// other, so placement repeats until every node found its parent.
    pub fn graft(&mut self, nodes: Vec<CommentNode>) -> Result<()> {
        let mut pending = nodes;

        while !pending.is_empty() {
            let before = pending.len();
            let mut unplaced = Vec::new();

            for node in pending {
                if let Err(node) = self.place(node) {
                    unplaced.push(node);
                }
            }

            if unplaced.len() == before {
                return Err(Error::MalformedThread(format!(
                    "{} expanded comment(s) reference an unknown parent (first: {}) in {}",
                    unplaced.len(),
                    unplaced[0].parent_id(),
                    self.url
                )));
            }
            pending = unplaced;
        }

        Ok(())
    }

    fn place(&mut self, node: CommentNode) -> std::result::Result<(), CommentNode> {
        let parent = node.parent_id().to_string();
        if parent == self.link_id {
            self.comments.push(node);
            return Ok(());
        }
        match find_comment_mut(&mut self.comments, &parent) {
            Some(comment) => {
                comment.replies.push(node);
                Ok(())
            }
            None => Err(node),
        }
    }

    pub fn into_expanded(self) -> Result<ExpandedThread> {
        let remaining = self.placeholder_count();
        if remaining > 0 {
            return Err(Error::MalformedThread(format!(
                "{} placeholder(s) left unexpanded in {}",
                remaining, self.url
            )));
        }
        Ok(ExpandedThread(self))
    }
}

fn drain_placeholders(nodes: &mut Vec<CommentNode>, out: &mut Vec<MorePlaceholder>) {
    let mut kept = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            CommentNode::More(more) => out.push(more),
            CommentNode::Comment(mut comment) => {
                drain_placeholders(&mut comment.replies, out);
                kept.push(CommentNode::Comment(comment));
            }
        }
    }
    *nodes = kept;
}

fn find_comment_mut<'a>(nodes: &'a mut [CommentNode], fullname: &str) -> Option<&'a mut Comment> {
    for node in nodes.iter_mut() {
        if let CommentNode::Comment(comment) = node {
            if comment.fullname() == fullname {
                return Some(comment);
            }
            if let Some(found) = find_comment_mut(&mut comment.replies, fullname) {
                return Some(found);
            }
        }
    }
    None
}

/// A thread with every placeholder resolved. Only built by [`Thread::into_expanded`].
#[derive(Debug, Clone)]
pub struct ExpandedThread(Thread);

impl ExpandedThread {
    pub fn url(&self) -> &str {
        &self.0.url
    }

    pub fn link_id(&self) -> &str {
        &self.0.link_id
    }

    /// All comments, top-level first, then each following level in order.
    pub fn comments(&self) -> Vec<&Comment> {
        let mut out = Vec::new();
        let mut queue: VecDeque<&CommentNode> = self.0.comments.iter().collect();

        while let Some(node) = queue.pop_front() {
            if let CommentNode::Comment(comment) = node {
                out.push(comment);
                queue.extend(comment.replies.iter());
            }
        }

        out
    }
}
