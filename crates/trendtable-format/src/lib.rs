//! Number formatting for trend-table cells.
//!
//! Format patterns are a small subset of spreadsheet number formats: an optional literal prefix,
//! a digit mask (`#,##0.00`), an optional percent marker and an optional literal suffix. Rendered
//! values are abbreviated by magnitude (`K`, `M`, `B`, `T`), so `1234567` with the default
//! pattern renders as `1.23M`.
//!
//! ```
//! use trendtable_format::format_number;
//!
//! assert_eq!(format_number(1_234_567.0, None), "1.23M");
//! assert_eq!(format_number(0.5, Some("0.00%")), "50.00%");
//! ```

#![forbid(unsafe_code)]

mod literal;
mod number;
mod pattern;

pub use crate::number::Magnitude;
pub use crate::pattern::FormatSpec;

/// Pattern used when a column has no format, or when the host asks for `auto`.
pub const DEFAULT_FORMAT: &str = "###,##0.00";

/// Decimal and thousands separators used when rendering numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    /// Decimal separator (e.g. `.` in `en-US`, `,` in many EU locales).
    pub decimal_sep: char,
    /// Thousands separator (e.g. `,` in `en-US`, `.` in `de-DE`).
    pub thousands_sep: char,
}

impl Locale {
    pub const fn en_us() -> Self {
        Self {
            decimal_sep: '.',
            thousands_sep: ',',
        }
    }

    pub const fn de_de() -> Self {
        Self {
            decimal_sep: ',',
            thousands_sep: '.',
        }
    }

    /// French uses U+00A0 NO-BREAK SPACE for grouping.
    pub const fn fr_fr() -> Self {
        Self {
            decimal_sep: ',',
            thousands_sep: '\u{00A0}',
        }
    }

    /// Resolve a locale tag such as `de-DE`, `de_DE` or `de_DE.UTF-8`.
    ///
    /// Only the language/region portion is considered. Unknown tags return `None`.
    pub fn for_tag(tag: &str) -> Option<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut key: String = trimmed
            .chars()
            .map(|ch| if ch == '_' { '-' } else { ch.to_ascii_lowercase() })
            .collect();
        // POSIX tags carry an encoding or modifier suffix (`de_DE.UTF-8`, `de_DE@euro`).
        if let Some(idx) = key.find(|ch| ch == '.' || ch == '@') {
            key.truncate(idx);
        }

        match key.as_str() {
            "en" | "en-us" | "en-gb" | "es-mx" => Some(Self::en_us()),
            "de" | "de-de" | "de-at" | "it" | "it-it" | "es" | "es-es" | "nl" | "nl-nl" => {
                Some(Self::de_de())
            }
            "fr" | "fr-fr" => Some(Self::fr_fr()),
            _ => None,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

/// Options that affect how numbers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub locale: Locale,
}

impl FormatOptions {
    pub fn with_locale(locale: Locale) -> Self {
        Self { locale }
    }
}

/// Resolve a host-supplied pattern to the pattern that is actually parsed.
///
/// `INHERIT` tokens are removed. A missing, blank or `auto` (any case) pattern resolves to
/// [`DEFAULT_FORMAT`].
pub fn normalize_pattern(pattern: Option<&str>) -> String {
    let Some(pattern) = pattern else {
        return DEFAULT_FORMAT.to_string();
    };
    let stripped = pattern.replace("INHERIT", "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
        return DEFAULT_FORMAT.to_string();
    }
    stripped
}

/// Format `value` with `pattern` using `en-US` separators.
///
/// Never fails: unusable patterns fall back to [`DEFAULT_FORMAT`] and non-finite values render
/// as `"0"`.
pub fn format_number(value: f64, pattern: Option<&str>) -> String {
    format_number_with_options(value, pattern, &FormatOptions::default())
}

/// Format `value` with `pattern` and explicit [`FormatOptions`].
pub fn format_number_with_options(value: f64, pattern: Option<&str>, options: &FormatOptions) -> String {
    let spec = FormatSpec::parse(&normalize_pattern(pattern));
    spec.format(value, options)
}
