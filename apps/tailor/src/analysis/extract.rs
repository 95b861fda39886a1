//! Contact, skill and keyword extraction over free text.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::analysis::stopwords::is_keyword_stopword;

pub const DEFAULT_KEYWORD_COUNT: usize = 10;

/// Vocabulary matched by [`extract_skills`].
pub const PREDEFINED_SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "javascript",
    "html",
    "css",
    "sql",
    "nosql",
    "mongodb",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "spring",
    "machine learning",
    "deep learning",
    "data science",
    "data analysis",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "git",
    "jira",
    "agile",
    "communication",
    "teamwork",
    "problem solving",
    "leadership",
    "project management",
];

struct Patterns {
    email: Regex,
    phone: Regex,
    word: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b")
            .expect("valid regex"),
        phone: Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid regex"),
        word: Regex::new(r"\w+(?:[-'.]\w+)*").expect("valid regex"),
    })
}

pub fn extract_emails(text: &str) -> BTreeSet<String> {
    patterns()
        .email
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn extract_phones(text: &str) -> BTreeSet<String> {
    patterns()
        .phone
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whole-word matchers for a skill vocabulary, compiled once.
pub struct SkillMatcher {
    skills: Vec<(String, Regex)>,
}

impl SkillMatcher {
    pub fn new(vocabulary: &[&str]) -> Result<Self, regex::Error> {
        let skills = vocabulary
            .iter()
            .map(|skill| -> Result<(String, Regex), regex::Error> {
                let pattern = format!(r"\b{}\b", regex::escape(&skill.to_lowercase()));
                Ok((capitalize(skill), Regex::new(&pattern)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { skills })
    }

    /// Case-insensitive whole-word matches, capitalized.
    pub fn find(&self, text: &str) -> BTreeSet<String> {
        let text_lower = text.to_lowercase();
        self.skills
            .iter()
            .filter(|(_, re)| re.is_match(&text_lower))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

fn predefined_matcher() -> &'static SkillMatcher {
    static MATCHER: OnceLock<SkillMatcher> = OnceLock::new();
    MATCHER.get_or_init(|| SkillMatcher::new(PREDEFINED_SKILLS).expect("valid regex"))
}

/// Skills from [`PREDEFINED_SKILLS`] mentioned in `text`.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    predefined_matcher().find(text)
}

/// Top `count` alphabetic non-stopword tokens by descending frequency.
/// Ties keep first-seen order.
pub fn extract_keywords(text: &str, count: usize) -> Vec<(String, usize)> {
    if text.is_empty() {
        return Vec::new();
    }

    let text_lower = text.to_lowercase();
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in patterns().word.find_iter(&text_lower).map(|m| m.as_str()) {
        if !token.chars().all(char::is_alphabetic) || is_keyword_stopword(token) {
            continue;
        }
        match index.get(token) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(token, order.len());
                order.push((token.to_string(), 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(count);
    order
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
