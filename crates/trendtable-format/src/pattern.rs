use crate::{literal, FormatOptions, DEFAULT_FORMAT};

/// A parsed numeric format pattern.
///
/// The pattern is split into a literal prefix, a digit mask and a literal suffix. Within the
/// mask, `,` in the integer part requests thousands grouping and the placeholders after `.`
/// control fraction digits: each `0` is a required digit, each `#` an optional one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// Fraction digits that are always shown (`0` placeholders after the decimal marker).
    pub decimal_places: usize,
    /// Additional fraction digits shown only when non-zero (`#`/`?` after the decimal marker).
    pub optional_decimals: usize,
    /// Whether the mask contained a decimal marker.
    pub explicit_precision: bool,
    pub thousands_separated: bool,
    pub prefix: String,
    pub suffix: String,
    pub is_percent: bool,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self::parse(DEFAULT_FORMAT)
    }
}

impl FormatSpec {
    /// Parse an already-normalized pattern (see [`crate::normalize_pattern`]).
    ///
    /// A pattern without any digit placeholder falls back to [`DEFAULT_FORMAT`].
    pub fn parse(pattern: &str) -> Self {
        let (first_idx, last_idx) = find_placeholder_span(pattern);
        let Some((start, end_placeholder)) = first_idx.zip(last_idx) else {
            log::debug!("format pattern {pattern:?} has no digit placeholder, using {DEFAULT_FORMAT:?}");
            return Self::parse(DEFAULT_FORMAT);
        };

        // Extend the mask over trailing grouping commas and a dangling decimal marker ("0.").
        let mut end = end_placeholder;
        while pattern[end..].starts_with(',') {
            end += 1;
        }
        if pattern[end..].starts_with('.') && !pattern[start..end].contains('.') {
            end += 1;
        }

        let prefix_raw = &pattern[..start];
        let mask = &pattern[start..end];
        let suffix_raw = &pattern[end..];

        let (int_mask, frac_mask) = match mask.split_once('.') {
            Some((int_mask, frac_mask)) => (int_mask, Some(frac_mask)),
            None => (mask, None),
        };
        let frac_mask = frac_mask.unwrap_or("");

        Self {
            decimal_places: frac_mask.chars().filter(|c| *c == '0').count(),
            optional_decimals: frac_mask.chars().filter(|c| matches!(c, '#' | '?')).count(),
            explicit_precision: mask.contains('.'),
            thousands_separated: int_mask.contains(','),
            prefix: literal::render_literal_segment(prefix_raw),
            suffix: literal::render_literal_segment(suffix_raw),
            is_percent: literal::count_unquoted(prefix_raw, '%') + literal::count_unquoted(suffix_raw, '%')
                > 0,
        }
    }

    /// Render `value` with this spec. Non-finite values render as `"0"`.
    pub fn format(&self, value: f64, options: &FormatOptions) -> String {
        crate::number::render(value, self, options)
    }
}

fn find_placeholder_span(s: &str) -> (Option<usize>, Option<usize>) {
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escape = false;
    let mut first: Option<usize> = None;
    let mut last: Option<usize> = None;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            }
            continue;
        }
        // Bracket tokens such as `[$€-407]` may contain digits.
        if in_brackets {
            if ch == ']' {
                in_brackets = false;
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '[' => in_brackets = true,
            '\\' => escape = true,
            '0' | '#' | '?' => {
                if first.is_none() {
                    first = Some(idx);
                }
                last = Some(idx + ch.len_utf8());
            }
            _ => {}
        }
    }

    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn parses_default_pattern() {
        let spec = FormatSpec::parse(DEFAULT_FORMAT);
        assert_eq!(
            spec,
            FormatSpec {
                decimal_places: 2,
                optional_decimals: 0,
                explicit_precision: true,
                thousands_separated: true,
                prefix: String::new(),
                suffix: String::new(),
                is_percent: false,
            }
        );
    }

    #[test]
    fn parses_decorated_percent_pattern() {
        let spec = FormatSpec::parse("\"Δ \"0.0#% \"YoY\"");
        assert_eq!(spec.prefix, "Δ ");
        assert_eq!(spec.suffix, " YoY");
        assert_eq!(spec.decimal_places, 1);
        assert_eq!(spec.optional_decimals, 1);
        assert!(spec.is_percent);
        assert!(!spec.thousands_separated);
    }

    #[test]
    fn integer_mask_has_no_explicit_precision() {
        let spec = FormatSpec::parse("$#,##0");
        assert_eq!(spec.prefix, "$");
        assert_eq!(spec.decimal_places, 0);
        assert!(!spec.explicit_precision);
        assert!(spec.thousands_separated);
    }

    #[test]
    fn dangling_decimal_marker_counts_as_explicit() {
        let spec = FormatSpec::parse("0. units");
        assert!(spec.explicit_precision);
        assert_eq!(spec.decimal_places, 0);
        assert_eq!(spec.suffix, " units");
    }

    #[test]
    fn quoted_digits_are_literal() {
        let spec = FormatSpec::parse("\"Q1 \"#,##0");
        assert_eq!(spec.prefix, "Q1 ");
        assert!(spec.thousands_separated);
    }

    #[test]
    fn pattern_without_placeholders_falls_back() {
        assert_eq!(FormatSpec::parse("General"), FormatSpec::default());
    }
}
