/// Render the literal text around a digit mask.
///
/// Double-quoted runs and backslash escapes are emitted verbatim. Bracket tokens are dropped,
/// except currency markers of the form `[$€-407]`, which render their symbol. Unquoted `%` is the
/// percent marker and is rendered by the number renderer instead.
pub(crate) fn render_literal_segment(segment: &str) -> String {
    let mut out = String::new();
    let mut in_quotes = false;
    let mut chars = segment.chars();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            } else {
                out.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '[' => {
                let mut content = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    content.push(c);
                }

                if closed {
                    if let Some(symbol) = currency_symbol_from_bracket(&content) {
                        out.push_str(symbol);
                    }
                } else {
                    // No closing `]`: treat as literal.
                    out.push('[');
                    out.push_str(&content);
                }
            }
            '%' => {}
            _ => out.push(ch),
        }
    }

    out
}

fn currency_symbol_from_bracket(content: &str) -> Option<&str> {
    let after = content.strip_prefix('$')?;
    let symbol = after.split_once('-').map(|(s, _)| s).unwrap_or(after);
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

/// Count occurrences of `needle` outside double quotes and escapes.
pub(crate) fn count_unquoted(s: &str, needle: char) -> usize {
    let mut in_quotes = false;
    let mut escape = false;
    let mut count = 0;
    for ch in s.chars() {
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
        match ch {
            '"' => in_quotes = true,
            '\\' => escape = true,
            _ if ch == needle => count += 1,
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_quotes_escapes_and_currency() {
        assert_eq!(render_literal_segment("\"USD \""), "USD ");
        assert_eq!(render_literal_segment("\\%"), "%");
        assert_eq!(render_literal_segment("[$€-407]"), "€");
        assert_eq!(render_literal_segment("[Red]$"), "$");
        assert_eq!(render_literal_segment("[oops"), "[oops");
        assert_eq!(render_literal_segment(" %"), " ");
    }

    #[test]
    fn counts_only_unquoted_markers() {
        assert_eq!(count_unquoted("0.00%", '%'), 1);
        assert_eq!(count_unquoted("0\"%\"", '%'), 0);
        assert_eq!(count_unquoted("0\\%", '%'), 0);
    }
}
