pub mod comment;
pub mod thread;

pub use comment::*;
pub use thread::*;
