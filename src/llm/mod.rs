pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;
pub mod throttle;
pub mod classifier;

pub use provider::{CompletionProvider, CompletionRequest};
pub use openai::OpenAIProvider;
pub use prompts::PromptTemplate;
pub use throttle::{FixedDelay, Throttle, Unthrottled};
pub use classifier::Classifier;
