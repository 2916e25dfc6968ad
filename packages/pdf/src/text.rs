//! Shared string utilities for side-aware matching and erosion.

use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

use crate::schema::Side;

/// Strips accents (and other combining marks) from a string.
///
/// Decomposes to NFKD and drops combining characters, so `"Pâté"` becomes
/// `"Pate"`. Used to compare header-stop markers against source lines that
/// may or may not have survived PDF text extraction with their accents
/// intact.
#[must_use]
pub fn remove_accents(input: &str) -> String {
    input.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Removes the first occurrence of `needle` from the left end of `s`.
///
/// Only the first match is removed; surrounding text (including whitespace)
/// is preserved.
#[must_use]
pub fn remove_first_on_left(s: &str, needle: &str) -> String {
    match s.find(needle) {
        Some(pos) => {
            let mut out = String::with_capacity(s.len() - needle.len());
            out.push_str(&s[..pos]);
            out.push_str(&s[pos + needle.len()..]);
            out
        }
        None => s.to_owned(),
    }
}

/// Removes the last occurrence of `needle` from `s`.
#[must_use]
pub fn remove_first_on_right(s: &str, needle: &str) -> String {
    match s.rfind(needle) {
        Some(pos) => {
            let mut out = String::with_capacity(s.len() - needle.len());
            out.push_str(&s[..pos]);
            out.push_str(&s[pos + needle.len()..]);
            out
        }
        None => s.to_owned(),
    }
}

/// Anchors a regex pattern to one side of a line.
///
/// On the left, the pattern must match at the very start of the line; an
/// optional `discriminating` pattern is allowed between the match and the
/// remainder. On the right it is the mirror image. The discriminating
/// pattern prevents a greedy match from eating characters that belong to the
/// adjacent column (e.g. `[^0-9]` keeps an integer match from absorbing the
/// digits of a neighbouring quantity).
///
/// The value of interest is always capture group 1.
#[must_use]
pub fn pattern_on_side(pattern: &str, side: Side, discriminating: &str) -> String {
    match side {
        Side::Left => format!("^({pattern})(?:{discriminating}.*)?$"),
        Side::Right => format!("^(?:.*{discriminating})?({pattern})$"),
    }
}
