use thiserror::Error;

/// Application-level error type.
///
/// Extraction degradation is deliberately absent: a failed model call or an
/// unparseable response yields the default listing, never an error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Template I/O error ({path}): {source}")]
    TemplateIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed template: {0}")]
    TemplateMalformed(String),

    #[error("Compilation failed: {0}")]
    Compilation(String),

    #[error("Could not extract text from document")]
    EmptyDocument,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for a failure that ends a run.
    ///
    /// Compilation failures are warnings at the process level and map to 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Compilation(_) => 0,
            AppError::Config(_) | AppError::Fetch(_) => 1,
            AppError::TemplateIo { .. } | AppError::TemplateMalformed(_) => 2,
            AppError::EmptyDocument => 3,
            AppError::Io(_) => 70,
        }
    }

    /// Wraps a startup configuration failure, keeping its context chain.
    pub fn config(err: anyhow::Error) -> Self {
        AppError::Config(format!("{err:#}"))
    }

    /// True for failures confined to a single output branch of the pipeline.
    pub fn is_branch_failure(&self) -> bool {
        matches!(
            self,
            AppError::TemplateIo { .. } | AppError::TemplateMalformed(_) | AppError::Compilation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_is_non_zero() {
        assert_eq!(AppError::Fetch("timeout".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_compilation_failure_exits_zero() {
        assert_eq!(AppError::Compilation("no pdf".to_string()).exit_code(), 0);
    }

    #[test]
    fn test_template_failures_exit_two() {
        let io = AppError::TemplateIo {
            path: "missing.tex".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(io.exit_code(), 2);
        assert_eq!(AppError::TemplateMalformed("{X}".to_string()).exit_code(), 2);
        assert!(io.is_branch_failure());
    }

    #[test]
    fn test_config_failure_keeps_context_and_exits_one() {
        let source = anyhow::anyhow!("environment variable not found")
            .context("Required environment variable 'GOOGLE_API_KEY' is not set");
        let err = AppError::config(source);
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "Configuration error: Required environment variable 'GOOGLE_API_KEY' is not set: \
             environment variable not found"
        );
    }

    #[test]
    fn test_template_io_message_names_path() {
        let err = AppError::TemplateIo {
            path: "templates/resume/base_resume.tex".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("base_resume.tex"));
    }
}
