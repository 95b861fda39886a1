// Job posting acquisition: HTTP fetch and content-text normalization.

pub mod fetcher;
pub mod normalizer;

pub use fetcher::{HttpFetcher, WebFetcher};
pub use normalizer::{html_to_text, normalize, truncate_chars};
