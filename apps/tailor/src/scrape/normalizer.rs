//! Text normalization: turns a scraped page (or plain text) into trimmed,
//! whitespace-collapsed content text.
//!
//! Non-content elements are skipped entirely. The designated content region is
//! preferred; if it is absent or empty the body is used, then the whole
//! document.

use std::sync::OnceLock;

use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

/// Elements whose subtrees never contribute text.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "header", "footer", "nav", "aside"];

pub const TRUNCATION_MARKER: &str = "\n... [Content Truncated]";

struct Patterns {
    blank_lines: Regex,
    horizontal_ws: Regex,
    content_id: Regex,
    content_class: Regex,
    markup: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        blank_lines: Regex::new(r"\n\s*\n").expect("valid regex"),
        horizontal_ws: Regex::new(r"[ \t]+").expect("valid regex"),
        content_id: Regex::new(r"(?i)content|main").expect("valid regex"),
        content_class: Regex::new(r"(?i)content|main|job-description").expect("valid regex"),
        markup: Regex::new(r"(?i)<!doctype\b|</?[a-z][a-z0-9-]*(\s[^<>]*)?/?>")
            .expect("valid regex"),
    })
}

/// Normalizes raw input, treating it as HTML when it contains any tag.
pub fn normalize(raw: &str) -> String {
    if patterns().markup.is_match(raw) {
        html_to_text(raw)
    } else {
        normalize_whitespace(raw)
    }
}

/// Extracts content text from an HTML document.
pub fn html_to_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let from_region = find_main_content(&doc)
        .map(element_text)
        .filter(|t| !t.is_empty());

    let text = from_region
        .or_else(|| {
            let body = Selector::parse("body").ok()?;
            doc.select(&body)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| element_text(doc.root_element()));

    normalize_whitespace(&text)
}

/// Collapses blank-line runs to a single newline and space/tab runs to a
/// single space, then trims.
pub fn normalize_whitespace(text: &str) -> String {
    let p = patterns();
    let text = p.blank_lines.replace_all(text, "\n");
    let text = p.horizontal_ws.replace_all(&text, " ");
    text.trim().to_string()
}

/// Cuts `text` to at most `max_chars` characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

fn find_main_content(doc: &Html) -> Option<ElementRef<'_>> {
    let p = patterns();
    first_content_match(doc, "main", |_| true)
        .or_else(|| first_content_match(doc, "article", |_| true))
        .or_else(|| {
            first_content_match(doc, "div", |el| {
                el.id().is_some_and(|id| p.content_id.is_match(id))
            })
        })
        .or_else(|| {
            first_content_match(doc, "div", |el| {
                el.classes().any(|c| p.content_class.is_match(c))
            })
        })
}

fn first_content_match<'a>(
    doc: &'a Html,
    tag: &str,
    predicate: impl Fn(&Element) -> bool,
) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(tag).ok()?;
    doc.select(&selector)
        .find(|el| !inside_non_content(el) && predicate(el.value()))
}

fn inside_non_content(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| is_non_content(a.value().name()))
}

fn is_non_content(tag: &str) -> bool {
    NON_CONTENT_TAGS.contains(&tag)
}

/// Joins every non-empty trimmed text node beneath `element` with newlines.
fn element_text(element: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    collect_text(element, &mut pieces);
    pieces.join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if !is_non_content(child_el.value().name()) {
                collect_text(child_el, out);
            }
        }
    }
}
