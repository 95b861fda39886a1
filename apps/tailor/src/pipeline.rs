//! Tailoring pipeline: orchestrates one run for one job posting.
//!
//! Flow: fetch → html_to_text → extract → { fill resume → compile → cleanup,
//!       fill message → write }.
//!
//! The resume and message branches are independent: a failure in one is
//! recorded and the other still runs.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::{error, info, warn};

use crate::compiler::{cleanup_aux_files, CompilationResult, DocumentCompiler, ProcessRunner};
use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::{ExtractedListing, StructuredExtractor};
use crate::llm_client::Extractor;
use crate::scrape::{html_to_text, WebFetcher};
use crate::template::{
    fill_document, generate_message, mention_pdf_attachment, read_template, write_document,
    FilledDocument,
};

const MAX_FILENAME_CHARS: usize = 100;

/// Collaborators for one run.
pub struct Pipeline<'a> {
    pub config: &'a Config,
    pub fetcher: &'a dyn WebFetcher,
    pub extractor: &'a dyn Extractor,
    pub runner: &'a dyn ProcessRunner,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub cleanup: bool,
}

/// Where one run writes its files.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPlan {
    pub base_name: String,
    pub tex_path: PathBuf,
    pub pdf_path: PathBuf,
    pub email_path: PathBuf,
}

impl OutputPlan {
    pub fn new(config: &Config, listing: &ExtractedListing, now: DateTime<Local>) -> Self {
        let base_name = format!(
            "{}_{}_{}",
            sanitize_filename(&listing.organization),
            sanitize_filename(&listing.title),
            now.format("%Y%m%d_%H%M%S")
        );
        let resume_dir = config.resume_output_dir();
        Self {
            tex_path: resume_dir.join(format!("{base_name}.tex")),
            pdf_path: resume_dir.join(format!("{base_name}.pdf")),
            email_path: config
                .email_output_dir()
                .join(format!("{base_name}_email.txt")),
            base_name,
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub listing: ExtractedListing,
    pub plan: OutputPlan,
    pub document_path: Option<PathBuf>,
    pub compilation: Option<CompilationResult>,
    pub message: Option<String>,
    pub message_path: Option<PathBuf>,
    pub failures: Vec<AppError>,
}

impl PipelineOutcome {
    /// 2 when a template branch failed; compilation failures only warn.
    pub fn exit_code(&self) -> i32 {
        self.failures
            .iter()
            .map(AppError::exit_code)
            .max()
            .unwrap_or(0)
    }
}

impl<'a> Pipeline<'a> {
    /// Runs the whole flow. Errors returned here end the run (fetch, empty
    /// page, unexpected I/O); branch failures land in `PipelineOutcome::failures`.
    pub async fn run(&self, url: &str, options: RunOptions) -> Result<PipelineOutcome, AppError> {
        info!("--- Starting job tailor run for {url} ---");

        let html = self.fetcher.fetch(url).await?;

        info!("Preparing clean text...");
        let clean_text = html_to_text(&html);
        if clean_text.is_empty() {
            return Err(AppError::Fetch(format!("no text found at {url}")));
        }

        let listing = StructuredExtractor::new(self.extractor)
            .extract(&clean_text, url)
            .await;
        print_listing_summary(&listing);

        let plan = OutputPlan::new(self.config, &listing, Local::now());
        let mut failures = Vec::new();

        // Resume branch
        let mut document_path = None;
        let mut compilation = None;
        match self.write_resume(&listing, &plan) {
            Ok(path) => {
                println!("LaTeX resume saved to: {}", path.display());
                let result = DocumentCompiler::new(self.runner, &self.config.latex_program)
                    .compile(&path);
                if result.succeeded {
                    println!("Successfully compiled PDF: {}", plan.pdf_path.display());
                    if options.cleanup {
                        cleanup_aux_files(&self.config.resume_output_dir(), &plan.base_name);
                    }
                } else {
                    println!("Failed to compile LaTeX to PDF.");
                    warn!("Compilation failed; continuing with message generation");
                    failures.push(AppError::Compilation(result.diagnostic_log.clone()));
                }
                document_path = Some(path);
                compilation = Some(result);
            }
            Err(e) => {
                error!("Resume branch failed: {e}");
                println!("Error: Failed to modify or save LaTeX resume. Skipping PDF compilation.");
                failures.push(e);
            }
        }

        // Message branch
        let pdf_produced = compilation.as_ref().is_some_and(|c| c.succeeded);
        let mut message = None;
        let mut message_path = None;
        match generate_message(&self.config.email_template_path(), &listing, &self.config.sender)
        {
            Ok(text) => {
                let text = if pdf_produced {
                    mention_pdf_attachment(&text)
                } else {
                    text
                };
                match write_message(&plan.email_path, &text) {
                    Ok(()) => {
                        println!("\n--- Generated Email Draft (Preview) ---\n{text}");
                        println!("----------------------------------------\n");
                        println!("Full email draft saved to: {}", plan.email_path.display());
                        message_path = Some(plan.email_path.clone());
                    }
                    Err(e) => {
                        error!("Error writing email draft {}: {e}", plan.email_path.display());
                        println!("Error: Could not save email draft file.");
                        println!("\n--- Generated Email Draft (Not Saved) ---\n{text}");
                        failures.push(e);
                    }
                }
                message = Some(text);
            }
            Err(e) => {
                error!("Message branch failed: {e}");
                println!("Error: Failed to generate email draft.");
                failures.push(e);
            }
        }

        info!("--- Job tailor run finished ---");

        Ok(PipelineOutcome {
            listing,
            plan,
            document_path,
            compilation,
            message,
            message_path,
            failures,
        })
    }

    fn write_resume(&self, listing: &ExtractedListing, plan: &OutputPlan) -> Result<PathBuf, AppError> {
        let template_path = self.config.resume_template_path();
        info!("Filling LaTeX template: {}", template_path.display());
        let template = read_template(&template_path)?;
        let document = FilledDocument {
            path: plan.tex_path.clone(),
            content: fill_document(&template, listing),
        };
        write_document(&document)?;
        Ok(document.path)
    }
}

fn write_message(path: &Path, text: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    info!("Email draft saved: {}", path.display());
    Ok(())
}

fn print_listing_summary(listing: &ExtractedListing) {
    let or_none = |items: &[String]| {
        if items.is_empty() {
            "None".to_string()
        } else {
            items.join(", ")
        }
    };
    println!("\n--- Extracted Information Summary ---");
    println!("Job Title: {}", listing.title);
    println!("Company Name: {}", listing.organization);
    println!("Extracted Skills: {}", or_none(&listing.required_skills));
    println!("Potential Emails: {}", or_none(&listing.contact_emails));
    println!(
        "JD Extracted: {}",
        if listing.has_extracted_description() {
            "Yes"
        } else {
            "No/Failed"
        }
    );
    println!("-------------------------------------\n");
}

fn unsafe_filename_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid regex"))
}

/// Strips path-unsafe characters, replaces spaces with underscores and
/// truncates to 100 characters.
pub fn sanitize_filename(name: &str) -> String {
    unsafe_filename_chars()
        .replace_all(name, "")
        .replace(' ', "_")
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect()
}
