//! LaTeX → PDF compilation with artifact verification.
//!
//! A zero exit status is not trusted on its own: the PDF must exist on disk
//! afterwards. Every failure becomes a failed `CompilationResult`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::compiler::process::{ProcessCommand, ProcessRunner};

/// Auxiliary files pdflatex leaves next to the source.
pub const AUX_EXTENSIONS: &[&str] = &[
    "log",
    "aux",
    "out",
    "toc",
    "nav",
    "snm",
    "fls",
    "fdb_latexmk",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationResult {
    pub succeeded: bool,
    pub artifact_path: Option<PathBuf>,
    pub diagnostic_log: String,
}

impl CompilationResult {
    fn failed(diagnostic_log: String) -> Self {
        Self {
            succeeded: false,
            artifact_path: None,
            diagnostic_log,
        }
    }
}

pub struct DocumentCompiler<'a> {
    runner: &'a dyn ProcessRunner,
    program: String,
}

impl<'a> DocumentCompiler<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn compile(&self, source_path: &Path) -> CompilationResult {
        if !source_path.is_file() {
            let message = format!("LaTeX file not found at {}", source_path.display());
            error!("Cannot compile: {message}");
            return CompilationResult::failed(message);
        }

        let (Some(file_name), Some(stem)) = (source_path.file_name(), source_path.file_stem())
        else {
            return CompilationResult::failed(format!(
                "{} has no file name",
                source_path.display()
            ));
        };
        let working_dir = match source_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let artifact_path = working_dir.join(format!("{}.pdf", stem.to_string_lossy()));

        let command = ProcessCommand {
            program: self.program.clone(),
            args: vec![
                "-interaction=nonstopmode".to_string(),
                file_name.to_string_lossy().into_owned(),
            ],
            working_dir,
        };

        info!(
            "Compiling {} to PDF in {}",
            file_name.to_string_lossy(),
            command.working_dir.display()
        );

        let output = match self.runner.run(&command) {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let message = format!(
                    "'{}' command not found. Is a LaTeX distribution installed and on PATH?",
                    self.program
                );
                error!("{message}");
                return CompilationResult::failed(message);
            }
            Err(e) => {
                let message = format!("could not run '{}': {e}", self.program);
                error!("{message}");
                return CompilationResult::failed(message);
            }
        };

        let diagnostic_log = format!("stdout:\n{}\nstderr:\n{}", output.stdout, output.stderr);

        if !output.succeeded() {
            error!(
                "{} failed with exit code {:?}",
                self.program, output.exit_code
            );
            debug!("{diagnostic_log}");
            return CompilationResult::failed(diagnostic_log);
        }

        if !artifact_path.is_file() {
            error!(
                "{} exited cleanly but no PDF at {}",
                self.program,
                artifact_path.display()
            );
            return CompilationResult::failed(format!(
                "PDF not found at {}\n{diagnostic_log}",
                artifact_path.display()
            ));
        }

        info!("Compiled {}", artifact_path.display());
        CompilationResult {
            succeeded: true,
            artifact_path: Some(artifact_path),
            diagnostic_log,
        }
    }
}

/// Removes known auxiliary files for `stem` in `dir`. Returns how many were removed.
pub fn cleanup_aux_files(dir: &Path, stem: &str) -> usize {
    info!("Cleaning up auxiliary files for {stem} in {}", dir.display());
    let mut removed = 0;
    for ext in AUX_EXTENSIONS {
        let path = dir.join(format!("{stem}.{ext}"));
        if !path.exists() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                removed += 1;
            }
            Err(e) => warn!("Could not remove auxiliary file {}: {e}", path.display()),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::process::ProcessOutput;
    use std::sync::Mutex;

    /// Fake runner: returns a fixed exit code and optionally writes the PDF.
    struct FakeRunner {
        exit_code: Option<i32>,
        produce_pdf: bool,
        spawn_error: Option<std::io::ErrorKind>,
        seen: Mutex<Vec<ProcessCommand>>,
    }

    impl FakeRunner {
        fn exiting(exit_code: i32, produce_pdf: bool) -> Self {
            Self {
                exit_code: Some(exit_code),
                produce_pdf,
                spawn_error: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn unable_to_spawn(kind: std::io::ErrorKind) -> Self {
            Self {
                exit_code: None,
                produce_pdf: false,
                spawn_error: Some(kind),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, command: &ProcessCommand) -> std::io::Result<ProcessOutput> {
            self.seen.lock().unwrap().push(command.clone());
            if let Some(kind) = self.spawn_error {
                return Err(std::io::Error::new(kind, "spawn failed"));
            }
            if self.produce_pdf {
                let tex = command.args.last().unwrap();
                let pdf = tex.replace(".tex", ".pdf");
                std::fs::write(command.working_dir.join(pdf), b"%PDF-1.5").unwrap();
            }
            Ok(ProcessOutput {
                exit_code: self.exit_code,
                stdout: "This is pdfTeX".to_string(),
                stderr: String::new(),
            })
        }
    }

    fn write_source(dir: &Path) -> PathBuf {
        let path = dir.join("Acme_Engineer_20240101_120000.tex");
        std::fs::write(&path, "\\documentclass{article}").unwrap();
        path
    }

    #[test]
    fn test_exit_zero_with_pdf_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path());
        let runner = FakeRunner::exiting(0, true);

        let result = DocumentCompiler::new(&runner, "pdflatex").compile(&source);

        assert!(result.succeeded);
        assert_eq!(
            result.artifact_path,
            Some(dir.path().join("Acme_Engineer_20240101_120000.pdf"))
        );
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].program, "pdflatex");
        assert_eq!(
            seen[0].args,
            vec!["-interaction=nonstopmode", "Acme_Engineer_20240101_120000.tex"]
        );
        assert_eq!(seen[0].working_dir, dir.path());
    }

    #[test]
    fn test_exit_zero_without_pdf_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path());
        let runner = FakeRunner::exiting(0, false);

        let result = DocumentCompiler::new(&runner, "pdflatex").compile(&source);

        assert!(!result.succeeded);
        assert!(result.artifact_path.is_none());
        let expected = format!("PDF not found at {}", source.with_extension("pdf").display());
        assert!(result.diagnostic_log.starts_with(&expected));
        assert!(result.diagnostic_log.contains("This is pdfTeX"));
    }

    #[test]
    fn test_non_zero_exit_fails_even_with_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path());
        let runner = FakeRunner::exiting(1, true);

        let result = DocumentCompiler::new(&runner, "pdflatex").compile(&source);
        assert!(!result.succeeded);
    }

    #[test]
    fn test_missing_binary_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path());
        let runner = FakeRunner::unable_to_spawn(std::io::ErrorKind::NotFound);

        let result = DocumentCompiler::new(&runner, "pdflatex").compile(&source);
        assert!(!result.succeeded);
        assert!(result.diagnostic_log.contains("not found"));
    }

    #[test]
    fn test_missing_source_does_not_spawn() {
        let runner = FakeRunner::exiting(0, true);
        let result =
            DocumentCompiler::new(&runner, "pdflatex").compile(Path::new("/nonexistent/cv.tex"));
        assert!(!result.succeeded);
        assert!(runner.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cleanup_removes_only_known_extensions_for_stem() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["cv.log", "cv.aux", "cv.fdb_latexmk", "cv.pdf", "cv.tex", "other.log"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        assert_eq!(cleanup_aux_files(dir.path(), "cv"), 3);
        assert!(dir.path().join("cv.pdf").exists());
        assert!(dir.path().join("cv.tex").exists());
        assert!(dir.path().join("other.log").exists());
        assert!(!dir.path().join("cv.aux").exists());
    }
}
