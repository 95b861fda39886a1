// Template filling: the LaTeX resume (escaped) and the outreach message (plain).

pub mod document;
pub mod message;

pub use document::{fill_document, read_template, write_document, FilledDocument};
pub use message::{fill_message, generate_message, mention_pdf_attachment};
