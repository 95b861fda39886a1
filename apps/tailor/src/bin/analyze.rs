use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use job_tailor::analysis::{analyze_text, similarity, DocumentReader, FileDocumentReader};
use job_tailor::config::log_directives;
use job_tailor::scrape::normalize;

/// Analyze a resume and optionally score it against a job description.
#[derive(Debug, Parser)]
#[command(name = "analyze", version, about)]
struct Cli {
    /// Resume file (.pdf or .txt)
    #[arg(long)]
    resume: PathBuf,

    /// Job description file (.pdf or .txt)
    #[arg(long, conflicts_with = "job_text")]
    job: Option<PathBuf>,

    /// Job description given inline
    #[arg(long)]
    job_text: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(log_directives(&[env!("CARGO_CRATE_NAME")], "info"))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let reader = FileDocumentReader;
    let resume_text = reader.read(&cli.resume);
    let report = match analyze_text(&resume_text) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e} ({})", cli.resume.display());
            std::process::exit(e.exit_code());
        }
    };
    info!("Analyzed {}", cli.resume.display());

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing analysis report")?
    );

    // pasted or saved postings may still carry markup
    let job_text = match (&cli.job, cli.job_text) {
        (Some(path), _) => Some(reader.read(path)),
        (None, text) => text,
    }
    .map(|text| normalize(&text));

    if let Some(job_text) = job_text {
        let match_score = similarity::score(&resume_text, &job_text);
        println!("\nResume-Job Match Score: {match_score:.2}%");
    }

    Ok(())
}
