mod config;
mod error;
mod llm;
pub mod parser;
mod processor;
pub mod prompt;
pub mod tracing;
pub mod validator;

pub use config::{Cli, Config};
pub use error::Error;
pub use llm::completer::Completer;
pub use llm::openai;
pub use processor::{builder::StoryboardProcessorBuilder, RunReport, StoryboardProcessor};
