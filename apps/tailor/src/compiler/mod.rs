// Document compilation: pdflatex behind the ProcessRunner boundary.

pub mod latex;
pub mod process;

pub use latex::{cleanup_aux_files, CompilationResult, DocumentCompiler};
pub use process::{ProcessCommand, ProcessOutput, ProcessRunner, SystemProcessRunner};
