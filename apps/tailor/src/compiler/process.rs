//! Process invocation capability. The only place that spawns external programs.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// A fully specified invocation: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

pub trait ProcessRunner: Send + Sync {
    /// Runs the command to completion, capturing both streams.
    /// Spawn failures (e.g. program not found) surface as `io::Error`.
    fn run(&self, command: &ProcessCommand) -> std::io::Result<ProcessOutput>;
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &ProcessCommand) -> std::io::Result<ProcessOutput> {
        debug!(
            "Running {} {:?} in {}",
            command.program,
            command.args,
            command.working_dir.display()
        );
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.working_dir)
            .output()?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_not_found() {
        let err = SystemProcessRunner
            .run(&ProcessCommand {
                program: "definitely-not-a-real-binary-4711".to_string(),
                args: vec![],
                working_dir: std::env::temp_dir(),
            })
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_succeeded_requires_exit_zero() {
        let mut output = ProcessOutput {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(output.succeeded());
        output.exit_code = Some(1);
        assert!(!output.succeeded());
        output.exit_code = None;
        assert!(!output.succeeded());
    }
}
