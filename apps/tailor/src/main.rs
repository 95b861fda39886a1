use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use job_tailor::compiler::SystemProcessRunner;
use job_tailor::config::{log_directives, Config};
use job_tailor::errors::AppError;
use job_tailor::llm_client::{self, LlmClient};
use job_tailor::pipeline::{Pipeline, RunOptions};
use job_tailor::scrape::HttpFetcher;

/// Tailor a LaTeX resume and an outreach message to one job posting.
#[derive(Debug, Parser)]
#[command(name = "job-tailor", version, about)]
struct Cli {
    /// URL of the job posting
    #[arg(long)]
    url: String,

    /// Remove LaTeX auxiliary files after a successful compile
    #[arg(long)]
    cleanup: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::from_env().map_err(AppError::config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_directives(&[], &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job-tailor v{}", env!("CARGO_PKG_VERSION"));
    if config.uses_default_sender() {
        warn!("Sender identity not configured; set TAILOR_SENDER_NAME and TAILOR_SENDER_CONTACT");
    }

    let fetcher = HttpFetcher::new()?;
    let llm = LlmClient::new(config.google_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let runner = SystemProcessRunner;

    let pipeline = Pipeline {
        config: &config,
        fetcher: &fetcher,
        extractor: &llm,
        runner: &runner,
    };

    let code = match pipeline.run(&cli.url, RunOptions { cleanup: cli.cleanup }).await {
        Ok(outcome) => {
            for failure in &outcome.failures {
                if failure.is_branch_failure() {
                    warn!("Branch failed: {failure}");
                } else {
                    error!("Unexpected failure: {failure}");
                }
            }
            outcome.exit_code()
        }
        Err(e) => {
            error!("Run aborted: {e}");
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}
