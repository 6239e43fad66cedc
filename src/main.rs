use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use threadsift::{
    Classifier, Config, FixedDelay, OpenAIProvider, PipelineConfig, RedditClient, ResearchPipeline,
    SerpApiClient,
};

#[derive(Parser, Debug)]
#[command(name = "threadsift")]
#[command(version = "0.1.0")]
#[command(about = "Find Reddit threads about a product and tag every comment with sentiment and topics")]
struct Args {
    /// Research query, e.g. "avalara vs shopify tax"
    query: String,

    /// CSV file to write
    #[arg(short, long, default_value = "reddit_comments.csv")]
    output: String,

    /// Model used for classification (overrides OPENAI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Domain the search is restricted to (overrides SEARCH_SITE)
    #[arg(long)]
    site: Option<String>,

    /// Pause before every classification call, in milliseconds, at least 2000 (overrides CLASSIFY_DELAY_MS)
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("threadsift=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let mut pipeline_config = PipelineConfig::from(&config);
    if let Some(model) = args.model {
        pipeline_config.model = model;
    }
    if let Some(site) = args.site {
        pipeline_config.search_site = site;
    }
    if let Some(delay_ms) = args.delay_ms {
        pipeline_config.classify_delay = Duration::from_millis(delay_ms);
    }

    // Initialize clients
    let search = SerpApiClient::new(
        config.serpapi_api_key.clone(),
        pipeline_config.search_site.clone(),
        config.http_timeout,
    )?;
    let reddit = RedditClient::connect(&config.reddit, config.http_timeout).await?;
    let llm = OpenAIProvider::new(config.openai_api_key.clone(), config.http_timeout)?;

    let classifier = Classifier::new(
        Arc::new(llm),
        Arc::new(FixedDelay::new(pipeline_config.classify_delay)),
        pipeline_config.model.clone(),
    );

    let pipeline = ResearchPipeline::new(search, reddit, classifier);

    tracing::info!("Starting research for: {}", args.query);
    let records = pipeline.run_to_file(&args.query, &args.output).await?;
    tracing::info!("{} comment(s) written to {}", records.len(), args.output);

    Ok(())
}
