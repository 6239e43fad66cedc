use std::sync::Arc;

use crate::error::Result;
use crate::llm::parser::{parse_sentiment, parse_tags};
use crate::llm::prompts::PromptTemplate;
use crate::llm::provider::{CompletionProvider, CompletionRequest};
use crate::llm::throttle::Throttle;
use crate::models::{Sentiment, TagSet};

/// Throttled access to the text-generation service.
pub struct Classifier {
    provider: Arc<dyn CompletionProvider>,
    throttle: Arc<dyn Throttle>,
    model: String,
}

impl Classifier {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        throttle: Arc<dyn Throttle>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            throttle,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Render `template` for `comment`, wait on the throttle, and return the
    /// raw completion text. Failures are not retried.
    pub async fn classify(
        &self,
        template: PromptTemplate,
        comment: &str,
        model: &str,
    ) -> Result<String> {
        self.throttle.acquire().await;

        tracing::debug!(
            provider = self.provider.name(),
            template = template.name(),
            model,
            "Classifying comment"
        );

        let request = CompletionRequest::new(model, template.render(comment));
        self.provider.complete(request).await
    }

    pub async fn sentiment(&self, comment: &str) -> Result<Sentiment> {
        let raw = self
            .classify(PromptTemplate::Sentiment, comment, &self.model)
            .await?;
        parse_sentiment(&raw)
    }

    pub async fn tags(&self, comment: &str) -> Result<TagSet> {
        let raw = self
            .classify(PromptTemplate::Tagging, comment, &self.model)
            .await?;
        parse_tags(&raw)
    }
}
