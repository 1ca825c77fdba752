use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compare two strings the way a user-facing, locale-aware sort would.
///
/// Base letters are compared first ignoring case and diacritics (`"Äpfel" < "apple" < "Banana"`),
/// then diacritics, then case with lowercase first. Remaining ties fall back to code point order
/// so the comparison stays total.
pub(crate) fn compare_text(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

fn base_key(s: &str) -> Vec<char> {
    s.nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accent_key(s: &str) -> Vec<char> {
    s.nfkd().flat_map(char::to_lowercase).collect()
}

fn case_key(s: &str) -> Vec<bool> {
    s.nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(char::is_uppercase)
        .collect()
}
