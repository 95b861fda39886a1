//! Resume analysis: contact details and skills, keyword counts, job similarity.

pub mod extract;
pub mod reader;
pub mod similarity;
pub mod stopwords;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::AppError;

pub use reader::{DocumentReader, FileDocumentReader};

const REPORT_KEYWORD_COUNT: usize = 15;
const PREVIEW_CHARS: usize = 500;

/// Derived view of one document; recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub skills: BTreeSet<String>,
    pub keywords: Vec<(String, usize)>,
    pub preview: String,
}

pub fn analyze_text(text: &str) -> Result<AnalysisReport, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::EmptyDocument);
    }

    Ok(AnalysisReport {
        emails: extract::extract_emails(text),
        phones: extract::extract_phones(text),
        skills: extract::extract_skills(text),
        keywords: extract::extract_keywords(text, REPORT_KEYWORD_COUNT),
        preview: format!("{}...", text.chars().take(PREVIEW_CHARS).collect::<String>()),
    })
}
