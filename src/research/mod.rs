pub mod flattener;
pub mod pipeline;

pub use flattener::{expand_all, Flattener};
pub use pipeline::ResearchPipeline;
