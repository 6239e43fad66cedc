use std::sync::Arc;

use crate::error::Result;
use crate::llm::Classifier;
use crate::models::{post_date_from_epoch, Comment, CommentRecord, ExpandedThread, Thread, DELETED_AUTHOR};
use crate::reddit::DiscussionPlatform;

/// Turns one discussion thread into annotated comment records.
pub struct Flattener {
    platform: Arc<dyn DiscussionPlatform>,
    classifier: Arc<Classifier>,
}

impl Flattener {
    pub fn new(platform: Arc<dyn DiscussionPlatform>, classifier: Arc<Classifier>) -> Self {
        Self {
            platform,
            classifier,
        }
    }

    /// Every comment of the thread, breadth-first, each classified for
    /// sentiment and tags. The first failure aborts the whole thread.
    pub async fn flatten(&self, thread_url: &str) -> Result<Vec<CommentRecord>> {
        let thread = self.platform.fetch_thread(thread_url).await?;
        let thread = expand_all(self.platform.as_ref(), thread).await?;

        let comments = thread.comments();
        tracing::info!("Classifying {} comment(s) from {}", comments.len(), thread_url);

        let mut records = Vec::with_capacity(comments.len());
        for comment in comments {
            let record = self.annotate(thread_url, comment).await?;
            tracing::info!(
                comment_id = %record.comment_id,
                parent_id = %record.parent_id,
                author = %record.author,
                sentiment = %record.sentiment,
                tags = %record.tags,
                post_date = %record.post_date,
                "{}",
                record.text
            );
            records.push(record);
        }

        Ok(records)
    }

    async fn annotate(&self, thread_url: &str, comment: &Comment) -> Result<CommentRecord> {
        let post_date = post_date_from_epoch(comment.created_utc)?;
        let sentiment = self.classifier.sentiment(&comment.body).await?;
        let tags = self.classifier.tags(&comment.body).await?;

        Ok(CommentRecord {
            thread_url: thread_url.to_string(),
            comment_id: comment.id.clone(),
            parent_id: comment.parent_id.clone(),
            author: comment
                .author
                .clone()
                .unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            text: comment.body.clone(),
            sentiment,
            tags,
            post_date,
        })
    }
}

/// Replace placeholders until none are left, however deep or numerous.
pub async fn expand_all(platform: &dyn DiscussionPlatform, mut thread: Thread) -> Result<ExpandedThread> {
    let mut round = 0;

    loop {
        let placeholders = thread.take_placeholders();
        if placeholders.is_empty() {
            break;
        }

        round += 1;
        tracing::debug!("Expansion round {}: {} placeholder(s)", round, placeholders.len());

        for placeholder in placeholders {
            let nodes = platform.expand(&thread.link_id, &placeholder).await?;
            thread.graft(nodes)?;
        }
    }

    thread.into_expanded()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::llm::{CompletionProvider, CompletionRequest, Unthrottled};
    use crate::models::thread::fixtures::{comment, more, thread};
    use crate::models::{CommentNode, MorePlaceholder, Sentiment, Tag};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Serves one thread and answers placeholders from a table keyed by the
    /// placeholder's parent.
    struct FakePlatform {
        thread: Thread,
        expansions: HashMap<String, Vec<CommentNode>>,
    }

    #[async_trait]
    impl DiscussionPlatform for FakePlatform {
        async fn fetch_thread(&self, _url: &str) -> Result<Thread> {
            Ok(self.thread.clone())
        }

        async fn expand(&self, _link_id: &str, placeholder: &MorePlaceholder) -> Result<Vec<CommentNode>> {
            Ok(self
                .expansions
                .get(&placeholder.parent_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Sentiment from keywords, tags from keywords, optional failure trigger.
    struct KeywordProvider;

    #[async_trait]
    impl CompletionProvider for KeywordProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            let comment = request.prompt.rsplit("Comment: ").next().unwrap_or_default();
            if comment.contains("explode") {
                return Err(Error::ClassificationService("boom".to_string()));
            }
            let answer = if request.prompt.contains("Tag Name:") {
                if comment.contains("expensive") { "PRICING" } else { "" }
            } else if comment.contains("expensive") {
                "NEGATIVE"
            } else {
                "NEUTRAL"
            };
            Ok(answer.to_string())
        }

        fn name(&self) -> &str {
            "keywords"
        }
    }

    fn flattener(platform: FakePlatform) -> Flattener {
        let classifier = Classifier::new(Arc::new(KeywordProvider), Arc::new(Unthrottled), "test-model");
        Flattener::new(Arc::new(platform), Arc::new(classifier))
    }

    fn platform(thread: Thread, expansions: Vec<(&str, Vec<CommentNode>)>) -> FakePlatform {
        FakePlatform {
            thread,
            expansions: expansions
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_every_comment_behind_placeholders_is_recorded() {
        // a -> [a1, more(a2 -> more(a2x))], more(top: b)
        let fake = platform(
            thread(vec![
                comment("a", "t3_abc", vec![comment("a1", "t1_a", vec![]), more("t1_a", &["a2"])]),
                more("t3_abc", &["b"]),
            ]),
            vec![
                ("t1_a", vec![comment("a2", "t1_a", vec![more("t1_a2", &[])])]),
                ("t3_abc", vec![comment("b", "t3_abc", vec![])]),
                ("t1_a2", vec![comment("a2x", "t1_a2", vec![])]),
            ],
        );

        let records = flattener(fake).flatten("https://www.reddit.com/r/test/comments/abc/title/").await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.comment_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "a1", "a2", "a2x"]);
    }

    #[tokio::test]
    async fn test_record_fields() {
        let mut tree = thread(vec![comment("c1", "t3_abc", vec![])]);
        if let CommentNode::Comment(c) = &mut tree.comments[0] {
            c.author = Some("alice".to_string());
            c.body = "too expensive".to_string();
        }

        let url = "https://www.reddit.com/r/tax/comments/abc/pricing/";
        let records = flattener(platform(tree, vec![])).flatten(url).await.unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.thread_url, url);
        assert_eq!(record.comment_id, "c1");
        assert_eq!(record.parent_id, "t3_abc");
        assert_eq!(record.author, "alice");
        assert_eq!(record.sentiment, Sentiment::Negative);
        assert!(record.tags.contains(Tag::Pricing));
        assert_eq!(record.to_row()[7], "2023-11-14");
    }

    #[tokio::test]
    async fn test_deleted_author_gets_placeholder() {
        let mut tree = thread(vec![comment("c1", "t3_abc", vec![])]);
        if let CommentNode::Comment(c) = &mut tree.comments[0] {
            c.author = None;
        }

        let records = flattener(platform(tree, vec![])).flatten("u").await.unwrap();
        assert_eq!(records[0].author, "[deleted]");
        assert!(records[0].tags.is_empty());
    }

    #[tokio::test]
    async fn test_classification_failure_aborts_thread() {
        let mut tree = thread(vec![comment("ok", "t3_abc", vec![]), comment("bad", "t3_abc", vec![])]);
        if let CommentNode::Comment(c) = &mut tree.comments[1] {
            c.body = "this will explode".to_string();
        }

        let err = flattener(platform(tree, vec![])).flatten("u").await.unwrap_err();
        assert!(matches!(err, Error::ClassificationService(_)));
    }

    #[tokio::test]
    async fn test_empty_thread_yields_no_records() {
        let records = flattener(platform(thread(vec![]), vec![])).flatten("u").await.unwrap();
        assert!(records.is_empty());
    }
}
