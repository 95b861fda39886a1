pub mod analysis;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod llm_client;
pub mod pipeline;
pub mod scrape;
pub mod template;
