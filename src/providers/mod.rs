//! External text-generation providers

pub mod openai;

pub use openai::OpenAiSummarizer;
