//! Splitting a generated draft into subject and body

use lazy_static::lazy_static;
use regex::Regex;

use super::types::GeneratedContent;

/// Subject used when the draft does not start with a `Subject:` line
pub const DEFAULT_SUBJECT: &str = "AI Generated Email";

/// Tone reported for `/generate-email-content` drafts
pub const CONTENT_TONE: &str = "friendly";

lazy_static! {
    /// Leading `Subject: ...` or `Subject - ...` line, any case.
    static ref SUBJECT_LINE: Regex = Regex::new(r"(?i)^\s*Subject[:\-]\s*(.+)\s*\n").unwrap();
}

/// Pull a leading subject line out of `text`.
///
/// Without a subject line the whole text is the message, untrimmed.
pub fn split_subject(text: &str) -> (String, String) {
    match SUBJECT_LINE.captures(text) {
        Some(caps) => {
            let subject = caps[1].trim().to_string();
            let matched = caps.get(0).map_or(0..0, |m| m.range());
            let mut message = String::with_capacity(text.len());
            message.push_str(&text[..matched.start]);
            message.push_str(&text[matched.end..]);
            (subject, message.trim().to_string())
        }
        None => (DEFAULT_SUBJECT.to_string(), text.to_string()),
    }
}

/// Whitespace-separated token count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn extract_content(text: &str) -> GeneratedContent {
    let (subject, message) = split_subject(text);
    GeneratedContent {
        word_count: word_count(&message),
        subject,
        message,
        tone: CONTENT_TONE.to_string(),
    }
}
