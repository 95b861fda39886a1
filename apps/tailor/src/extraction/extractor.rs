//! Structured extraction: posting text in, `ExtractedListing` out.
//!
//! This step never fails: model errors and unusable output degrade to the
//! default listing with a logged diagnostic.

use serde_json::Value;
use tracing::{info, warn};

use crate::extraction::listing::ExtractedListing;
use crate::extraction::prompts::build_extraction_prompt;
use crate::llm_client::{extract_json_payload, Extractor};
use crate::scrape::truncate_chars;

/// Upper bound on posting characters sent to the model.
pub const MAX_PROMPT_CHARS: usize = 15_000;

pub struct StructuredExtractor<'a> {
    extractor: &'a dyn Extractor,
}

impl<'a> StructuredExtractor<'a> {
    pub fn new(extractor: &'a dyn Extractor) -> Self {
        Self { extractor }
    }

    pub async fn extract(&self, text: &str, source_ref: &str) -> ExtractedListing {
        info!("Attempting data extraction for {source_ref}");

        let bounded = truncate_chars(text, MAX_PROMPT_CHARS);
        let prompt = build_extraction_prompt(&bounded, source_ref);

        let raw = match self.extractor.invoke(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Extraction degraded: model call failed: {e}");
                return ExtractedListing::default();
            }
        };

        match parse_listing(&raw) {
            Ok(listing) => listing,
            Err(reason) => {
                warn!(
                    "Extraction degraded: {reason}; response starts with {:?}",
                    raw.chars().take(120).collect::<String>()
                );
                ExtractedListing::default()
            }
        }
    }
}

/// Parses a raw model response into a listing, or explains why it cannot.
pub fn parse_listing(raw: &str) -> Result<ExtractedListing, String> {
    let payload = extract_json_payload(raw);
    let value: Value =
        serde_json::from_str(payload).map_err(|e| format!("response is not valid JSON: {e}"))?;
    let object = value
        .as_object()
        .ok_or_else(|| "response JSON is not an object".to_string())?;
    Ok(ExtractedListing::from_model_object(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::scrape::normalizer::TRUNCATION_MARKER;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned response and records the prompt it received.
    struct CannedExtractor {
        response: Result<String, u16>,
        seen_prompt: Mutex<Option<String>>,
    }

    impl CannedExtractor {
        fn ok(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                seen_prompt: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                response: Err(status),
                seen_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Extractor for CannedExtractor {
        async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
            *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_fenced_json_is_parsed() {
        let canned = CannedExtractor::ok(
            "Sure!\n```json\n{\"job_title\": \"Data Engineer\", \"company_name\": \"Globex\", \
             \"job_description\": \"Own the warehouse.\", \"required_skills\": [\"SQL\"], \"emails\": []}\n```",
        );
        let listing = StructuredExtractor::new(&canned)
            .extract("posting", "https://example.com")
            .await;
        assert_eq!(listing.title, "Data Engineer");
        assert_eq!(listing.organization, "Globex");
        assert_eq!(listing.required_skills, vec!["SQL"]);
    }

    #[tokio::test]
    async fn test_bare_json_is_parsed() {
        let canned = CannedExtractor::ok(r#"{"job_title": "SRE"}"#);
        let listing = StructuredExtractor::new(&canned).extract("x", "u").await;
        assert_eq!(listing.title, "SRE");
        assert_eq!(listing.organization, "Unknown Company (Gemini)");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_exact_default() {
        let canned = CannedExtractor::ok("```json\n{\"job_title\": \"SRE\",}\n```");
        let listing = StructuredExtractor::new(&canned).extract("x", "u").await;
        assert_eq!(listing, ExtractedListing::default());
        assert_eq!(listing.title, "Unknown Role (Gemini)");
        assert_eq!(listing.organization, "Unknown Company (Gemini)");
        assert_eq!(
            listing.description,
            "Could not extract Job Description via Gemini."
        );
        assert!(listing.required_skills.is_empty());
        assert!(listing.contact_emails.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_json_returns_default() {
        let canned = CannedExtractor::ok(r#"["Rust", "SQL"]"#);
        let listing = StructuredExtractor::new(&canned).extract("x", "u").await;
        assert_eq!(listing, ExtractedListing::default());
    }

    #[tokio::test]
    async fn test_model_failure_returns_default() {
        let canned = CannedExtractor::failing(429);
        let listing = StructuredExtractor::new(&canned).extract("x", "u").await;
        assert_eq!(listing, ExtractedListing::default());
    }

    #[tokio::test]
    async fn test_long_text_is_truncated_before_prompting() {
        let canned = CannedExtractor::ok("{}");
        let text = "a".repeat(MAX_PROMPT_CHARS + 500);
        StructuredExtractor::new(&canned).extract(&text, "u").await;

        let prompt = canned.seen_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.ends_with(TRUNCATION_MARKER));
        assert!(!prompt.contains(&"a".repeat(MAX_PROMPT_CHARS + 1)));
        assert!(prompt.contains(&"a".repeat(MAX_PROMPT_CHARS)));
    }

    #[test]
    fn test_parse_listing_reports_reason() {
        assert!(parse_listing("not json").unwrap_err().contains("not valid JSON"));
        assert!(parse_listing("42").unwrap_err().contains("not an object"));
    }
}
