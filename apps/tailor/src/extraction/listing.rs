use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TITLE: &str = "Unknown Role (Gemini)";
pub const DEFAULT_ORGANIZATION: &str = "Unknown Company (Gemini)";
pub const DEFAULT_DESCRIPTION: &str = "Could not extract Job Description via Gemini.";

/// Structured job-posting fields. Every field always holds a well-typed value;
/// the model's wire keys are kept for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedListing {
    #[serde(rename = "job_title")]
    pub title: String,
    #[serde(rename = "company_name")]
    pub organization: String,
    #[serde(rename = "job_description")]
    pub description: String,
    pub required_skills: Vec<String>,
    /// Deduplicated, first-seen order.
    #[serde(rename = "emails")]
    pub contact_emails: Vec<String>,
}

impl Default for ExtractedListing {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            required_skills: Vec::new(),
            contact_emails: Vec::new(),
        }
    }
}

impl ExtractedListing {
    /// Overlays the keys of a parsed model response onto the default record.
    ///
    /// String keys win only when they hold a string. List keys must be arrays;
    /// otherwise they reset to empty. Non-string and blank list items are dropped.
    pub fn from_model_object(object: &Map<String, Value>) -> Self {
        let mut listing = Self::default();

        if let Some(title) = string_field(object, "job_title") {
            listing.title = title;
        }
        if let Some(organization) = string_field(object, "company_name") {
            listing.organization = organization;
        }
        if let Some(description) = string_field(object, "job_description") {
            listing.description = description;
        }

        listing.required_skills = string_list(object, "required_skills");

        let mut emails: Vec<String> = Vec::new();
        for email in string_list(object, "emails") {
            if !emails.contains(&email) {
                emails.push(email);
            }
        }
        listing.contact_emails = emails;

        listing
    }

    /// True when the description carries real extracted content.
    pub fn has_extracted_description(&self) -> bool {
        !self.description.is_empty() && !self.description.starts_with("Could not")
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
