use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_SENDER_NAME: &str = "Your Name";
const DEFAULT_SENDER_CONTACT: &str = "your.email@example.com";
/// Shipped templates and the output tree live next to the crate manifest, so
/// runs work from any working directory.
const DEFAULT_TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");
const DEFAULT_OUTPUT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/output");

/// Application configuration loaded from environment variables.
/// Fails at startup if the model credential is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub sender: SenderIdentity,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub latex_program: String,
    pub rust_log: String,
}

/// Fixed sender values substituted into the outreach message.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderIdentity {
    pub name: String,
    pub contact: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let google_api_key = require_env("GOOGLE_API_KEY")?;
        validate_api_key(&google_api_key)?;

        Ok(Config {
            google_api_key,
            sender: SenderIdentity {
                name: optional_env("TAILOR_SENDER_NAME", DEFAULT_SENDER_NAME),
                contact: optional_env("TAILOR_SENDER_CONTACT", DEFAULT_SENDER_CONTACT),
            },
            template_dir: PathBuf::from(optional_env("TAILOR_TEMPLATE_DIR", DEFAULT_TEMPLATE_DIR)),
            output_dir: PathBuf::from(optional_env("TAILOR_OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
            latex_program: optional_env("LATEX_PROGRAM", "pdflatex"),
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    pub fn resume_template_path(&self) -> PathBuf {
        self.template_dir.join("resume").join("base_resume.tex")
    }

    pub fn email_template_path(&self) -> PathBuf {
        self.template_dir.join("email").join("cold_email_template.txt")
    }

    pub fn resume_output_dir(&self) -> PathBuf {
        self.output_dir.join("resumes")
    }

    pub fn email_output_dir(&self) -> PathBuf {
        self.output_dir.join("emails")
    }

    pub fn uses_default_sender(&self) -> bool {
        self.sender.name == DEFAULT_SENDER_NAME || self.sender.contact == DEFAULT_SENDER_CONTACT
    }
}

/// Default `EnvFilter` directives: the library target plus any binary
/// targets, all at `level`.
pub fn log_directives(extra_targets: &[&str], level: &str) -> String {
    std::iter::once(env!("CARGO_CRATE_NAME"))
        .chain(extra_targets.iter().copied())
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Rejects keys that cannot possibly authenticate, before any network call.
fn validate_api_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        bail!("GOOGLE_API_KEY is set but empty");
    }
    if key.chars().any(char::is_whitespace) {
        bail!("GOOGLE_API_KEY must not contain whitespace");
    }
    Ok(())
}
