// Listing extraction: prompt construction, model call, tolerant response parsing.
// All model calls go through llm_client::Extractor.

pub mod extractor;
pub mod listing;
pub mod prompts;

pub use extractor::StructuredExtractor;
pub use listing::ExtractedListing;
