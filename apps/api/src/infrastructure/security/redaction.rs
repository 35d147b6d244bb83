//! Pattern-based removal of contact details from comment text.
//!
//! Each pass replaces every match with a fixed placeholder. Placeholders
//! contain nothing the patterns can match, so every pass is idempotent.

use lazy_static::lazy_static;
use regex::{Captures, NoExpand, Regex};

pub const LINK_PLACEHOLDER: &str = "[link removed]";
pub const EMAIL_PLACEHOLDER: &str = "[email removed]";
pub const PHONE_PLACEHOLDER: &str = "[phone number removed]";

const MIN_PHONE_DIGITS: usize = 10;

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', ')', ']', '}', '"', '\''];

/// Entities produced by the sanitizer that can end up glued to a link.
const TRAILING_ENTITIES: &[&str] = &["&#34;", "&#39;", "&gt;", "&lt;", "&amp;"];

lazy_static! {
    static ref LINK: Regex =
        Regex::new(r"(?i)\b(?:https?://\S*|www\.[a-z0-9\-]\S*)").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap();
    static ref PHONE: Regex = Regex::new(
        r"\+\d{1,3}(?:[ .\-]?\(?\d{1,4}\)?){2,5}|(?:\d{1,3}[ .\-])?(?:\(\d{3}\)|\d{3})[ .\-]?\d{3}[ .\-]?\d{4}"
    )
    .unwrap();
}

/// Replaces `http://`, `https://` and `www.` links. Punctuation trailing a
/// link stays outside the placeholder.
pub fn remove_links(text: &str) -> String {
    LINK.replace_all(text, |caps: &Captures| {
        let matched = &caps[0];
        let kept = trailing_suffix_len(matched);
        format!("{LINK_PLACEHOLDER}{}", &matched[matched.len() - kept..])
    })
    .into_owned()
}

pub fn remove_emails(text: &str) -> String {
    EMAIL.replace_all(text, NoExpand(EMAIL_PLACEHOLDER)).into_owned()
}

/// Replaces phone numbers with at least ten digits. Shorter digit groups
/// (local seven-digit numbers, extensions) are left alone, as is any match
/// that is only part of a longer digit run. Letters glued to a number
/// (`x89`, `ext`, `tel`) stay outside the placeholder.
pub fn remove_phone_numbers(text: &str) -> String {
    PHONE
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            let digits = matched.chars().filter(char::is_ascii_digit).count();
            let glued = caps
                .get(0)
                .is_some_and(|m| touches_digit(text, m.start(), m.end()));
            if digits >= MIN_PHONE_DIGITS && !glued {
                PHONE_PLACEHOLDER.to_string()
            } else {
                matched.to_string()
            }
        })
        .into_owned()
}

/// All three passes: links, then emails, then phone numbers.
pub fn redact_contact_details(text: &str) -> String {
    remove_phone_numbers(&remove_emails(&remove_links(text)))
}

fn touches_digit(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    [before, after]
        .into_iter()
        .flatten()
        .any(|c| c.is_ascii_digit())
}

fn trailing_suffix_len(matched: &str) -> usize {
    let mut rest = matched;
    loop {
        if let Some(entity) = TRAILING_ENTITIES.iter().find(|e| rest.ends_with(*e)) {
            rest = &rest[..rest.len() - entity.len()];
            continue;
        }
        let trimmed = rest.trim_end_matches(TRAILING_PUNCTUATION);
        if trimmed.len() == rest.len() {
            break;
        }
        rest = trimmed;
    }
    matched.len() - rest.len()
}
