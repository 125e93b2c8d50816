mod client;
mod parser;
mod prompt;

pub use client::{QuoteClient, QuoteGenerator};
pub use prompt::ModelConfig;
