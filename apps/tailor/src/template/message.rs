//! Outreach message filling: named `{PLACEHOLDER}` substitution.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::info;

use crate::config::SenderIdentity;
use crate::errors::AppError;
use crate::extraction::ExtractedListing;

/// Left in the message for manual completion.
pub const SPECIFIC_JD_POINT: &str = "[Mention something specific from the JD]";
pub const FALLBACK_SKILLS: &str = "relevant skills";
const TOP_SKILL_COUNT: usize = 3;

const ATTACHMENT_PHRASE: &str = "My attached resume provides";
const ATTACHMENT_PHRASE_PDF: &str = "My attached resume (PDF) provides";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}|\{[^{}\n]*\}|[{}]")
            .expect("valid regex")
    })
}

/// Reads the message template and fills it.
pub fn generate_message(
    template_path: &Path,
    listing: &ExtractedListing,
    sender: &SenderIdentity,
) -> Result<String, AppError> {
    info!(
        "Generating message from template: {}",
        template_path.display()
    );
    let template =
        std::fs::read_to_string(template_path).map_err(|source| AppError::TemplateIo {
            path: template_path.display().to_string(),
            source,
        })?;
    fill_message(&template, listing, sender)
}

/// Substitutes every named placeholder. `{{` and `}}` render as literal
/// braces. An unknown `{NAME}`, a braced non-identifier such as `{0}`, or an
/// unpaired brace makes the template malformed.
pub fn fill_message(
    template: &str,
    listing: &ExtractedListing,
    sender: &SenderIdentity,
) -> Result<String, AppError> {
    let values = placeholder_values(listing, sender);

    let invalid: Vec<&str> = placeholder_regex()
        .captures_iter(template)
        .filter(|caps| match caps.get(1) {
            Some(name) => !values.contains_key(name.as_str()),
            None => !matches!(&caps[0], "{{" | "}}"),
        })
        .filter_map(|caps| caps.get(0))
        .map(|m| m.as_str())
        .collect();
    if !invalid.is_empty() {
        return Err(AppError::TemplateMalformed(format!(
            "unresolved placeholder(s): {}",
            invalid.join(", ")
        )));
    }

    let filled = placeholder_regex().replace_all(template, |caps: &Captures| {
        match caps.get(1) {
            Some(name) => values.get(name.as_str()).cloned().unwrap_or_default(),
            None if &caps[0] == "{{" => "{".to_string(),
            None => "}".to_string(),
        }
    });
    Ok(filled.into_owned())
}

/// Notes the PDF attachment in the first matching sentence, if any.
pub fn mention_pdf_attachment(message: &str) -> String {
    message.replacen(ATTACHMENT_PHRASE, ATTACHMENT_PHRASE_PDF, 1)
}

/// First three skills, comma-joined, or a generic phrase.
pub fn top_skills(skills: &[String]) -> String {
    if skills.is_empty() {
        FALLBACK_SKILLS.to_string()
    } else {
        skills
            .iter()
            .take(TOP_SKILL_COUNT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn placeholder_values(
    listing: &ExtractedListing,
    sender: &SenderIdentity,
) -> HashMap<&'static str, String> {
    HashMap::from([
        ("ROLE_TITLE", listing.title.clone()),
        ("COMPANY_NAME", listing.organization.clone()),
        ("KEY_SKILLS", top_skills(&listing.required_skills)),
        ("SPECIFIC_JD_POINT", SPECIFIC_JD_POINT.to_string()),
        ("YOUR_NAME", sender.name.clone()),
        ("YOUR_CONTACT_INFO", sender.contact.clone()),
    ])
}
