//! LaTeX resume filling: summary and skills placeholders.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::ExtractedListing;

pub const SUMMARY_PLACEHOLDER: &str = "%<SUMMARY_PLACEHOLDER>%";
pub const SKILLS_PLACEHOLDER: &str = "%<SKILLS_LIST_PLACEHOLDER>%";

pub const NO_SKILLS_ITEM: &str = "No specific skills extracted.";
const MIN_DESCRIPTION_CHARS: usize = 30;

/// A filled template ready to be written once.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledDocument {
    pub path: PathBuf,
    pub content: String,
}

/// Reads the resume template from disk.
pub fn read_template(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::TemplateIo {
        path: path.display().to_string(),
        source,
    })
}

/// Substitutes the summary and skills placeholders. Each token is replaced
/// once; everything else passes through unchanged.
pub fn fill_document(template: &str, listing: &ExtractedListing) -> String {
    let summary = escape_latex(&build_summary(listing));
    let skills = render_skills(&listing.required_skills);

    let filled = replace_once(template, SUMMARY_PLACEHOLDER, &summary);
    replace_once(&filled, SKILLS_PLACEHOLDER, &skills)
}

/// Writes a filled document, creating its directory.
pub fn write_document(document: &FilledDocument) -> Result<(), AppError> {
    if let Some(parent) = document.path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&document.path, &document.content)?;
    info!("Saved filled document to {}", document.path.display());
    Ok(())
}

/// The summary sentence: generic when the description is unusable, otherwise
/// quoting the description verbatim.
pub fn build_summary(listing: &ExtractedListing) -> String {
    let description = listing.description.as_str();
    let unusable = description.is_empty()
        || description.chars().count() < MIN_DESCRIPTION_CHARS
        || description.starts_with("Could not extract");

    if unusable {
        format!(
            "Highly motivated professional seeking the {} position at {}.",
            listing.title, listing.organization
        )
    } else {
        format!(
            "Summary based on job description: {description} My background aligns with the requirements of the {} position.",
            listing.title
        )
    }
}

/// One `\item` line per skill, or a single placeholder item.
pub fn render_skills(skills: &[String]) -> String {
    if skills.is_empty() {
        return format!("    \\item {NO_SKILLS_ITEM}");
    }
    skills
        .iter()
        .map(|skill| format!("    \\item {}", escape_latex(skill)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefixes `%`, `&` and `_` with a backslash in a single pass.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '&' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn replace_once(template: &str, token: &str, value: &str) -> String {
    if !template.contains(token) {
        warn!("Template has no {token} placeholder; leaving it unchanged");
        return template.to_string();
    }
    template.replacen(token, value, 1)
}
