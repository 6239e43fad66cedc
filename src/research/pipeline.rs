use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::llm::Classifier;
use crate::models::CommentRecord;
use crate::reddit::DiscussionPlatform;
use crate::research::flattener::Flattener;
use crate::search::SearchProvider;
use crate::storage::CsvWriter;

pub struct ResearchPipeline {
    search: Arc<dyn SearchProvider>,
    flattener: Flattener,
}

impl ResearchPipeline {
    pub fn new(
        search: impl SearchProvider + 'static,
        platform: impl DiscussionPlatform + 'static,
        classifier: Classifier,
    ) -> Self {
        Self {
            search: Arc::new(search),
            flattener: Flattener::new(Arc::new(platform), Arc::new(classifier)),
        }
    }

    /// Discover threads for `query` and flatten each one, in discovery order.
    /// Threads run one after another since every classification call shares
    /// the same throttle.
    pub async fn run(&self, query: &str) -> Result<Vec<CommentRecord>> {
        // Step 1: Discover thread URLs
        let urls = self.search.discover(query).await?;
        tracing::info!("Found {} thread(s) to process", urls.len());

        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} threads")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        // Step 2: Flatten and classify every thread
        let mut records = Vec::new();
        for url in &urls {
            let rows = self.flattener.flatten(url).await?;
            tracing::info!("{} comment(s) from {}", rows.len(), url);
            records.extend(rows);
            pb.inc(1);
        }

        pb.finish_with_message("All threads processed");
        tracing::info!("Collected {} comment(s) in total", records.len());

        Ok(records)
    }

    /// [`run`](Self::run), then write every collected row to `path`. The rows
    /// are handed back as well.
    pub async fn run_to_file<P: AsRef<Path>>(&self, query: &str, path: P) -> Result<Vec<CommentRecord>> {
        let records = self.run(query).await?;
        CsvWriter::write(path, &records)?;
        Ok(records)
    }
}
