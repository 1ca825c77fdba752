use crate::{FormatOptions, FormatSpec};

/// Magnitude abbreviation applied to large values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Magnitude {
    None,
    Thousand,
    Million,
    Billion,
    Trillion,
}

impl Magnitude {
    /// The largest magnitude whose threshold `abs` meets or exceeds.
    pub fn for_value(abs: f64) -> Self {
        if abs >= 1e12 {
            Self::Trillion
        } else if abs >= 1e9 {
            Self::Billion
        } else if abs >= 1e6 {
            Self::Million
        } else if abs >= 1e3 {
            Self::Thousand
        } else {
            Self::None
        }
    }

    pub fn divisor(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Thousand => 1e3,
            Self::Million => 1e6,
            Self::Billion => 1e9,
            Self::Trillion => 1e12,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Thousand => "K",
            Self::Million => "M",
            Self::Billion => "B",
            Self::Trillion => "T",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::None => Some(Self::Thousand),
            Self::Thousand => Some(Self::Million),
            Self::Million => Some(Self::Billion),
            Self::Billion => Some(Self::Trillion),
            Self::Trillion => None,
        }
    }
}

pub(crate) fn render(value: f64, spec: &FormatSpec, options: &FormatOptions) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let mut display = value.abs();
    if spec.is_percent {
        display *= 100.0;
        if !display.is_finite() {
            return "0".to_string();
        }
    }

    // Percentages are never abbreviated.
    let mut magnitude = if spec.is_percent {
        Magnitude::None
    } else {
        Magnitude::for_value(display)
    };
    let mut scaled = display / magnitude.divisor();
    let (mut min_frac, mut max_frac) = fraction_digits(scaled, spec);
    let mut rounded = round_to(scaled, max_frac);

    // Rounding can push a value to the next magnitude (999_999 -> "1000.00K"); normalize.
    while rounded >= 1000.0 && !spec.is_percent {
        let Some(next) = magnitude.next() else {
            break;
        };
        magnitude = next;
        scaled = display / magnitude.divisor();
        (min_frac, max_frac) = fraction_digits(scaled, spec);
        rounded = round_to(scaled, max_frac);
    }

    let digits = format_fixed(rounded, min_frac, max_frac, spec.thousands_separated, options);

    let mut out = String::new();
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&spec.prefix);
    out.push_str(&digits);
    out.push_str(magnitude.suffix());
    if spec.is_percent {
        out.push('%');
    }
    out.push_str(&spec.suffix);
    out
}

/// Fraction digits beyond this exceed `f64` precision and are not rendered.
const MAX_FRACTION_DIGITS: usize = 15;

/// Returns `(min, max)` fraction digits for a non-negative display value.
fn fraction_digits(scaled: f64, spec: &FormatSpec) -> (usize, usize) {
    if spec.decimal_places == 0 && !spec.explicit_precision && scaled > 0.0 && scaled < 1.0 {
        return (0, graduated_precision(scaled));
    }
    let max = (spec.decimal_places + spec.optional_decimals).min(MAX_FRACTION_DIGITS);
    (spec.decimal_places.min(max), max)
}

/// Precision for small values rendered through an integer mask, so they do not collapse to "0".
fn graduated_precision(abs: f64) -> usize {
    if abs >= 0.1 {
        2
    } else if abs >= 0.01 {
        3
    } else if abs >= 0.001 {
        5
    } else if abs >= 0.0001 {
        6
    } else if abs >= 0.00001 {
        7
    } else if abs >= 0.000001 {
        8
    } else {
        0
    }
}

fn format_fixed(rounded: f64, min_frac: usize, max_frac: usize, grouping: bool, options: &FormatOptions) -> String {
    let (mut int_part, mut frac_part) = if max_frac == 0 {
        (format!("{:.0}", rounded), String::new())
    } else {
        let s = format!("{:.*}", max_frac, rounded);
        match s.split_once('.') {
            Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
            None => (s, String::new()),
        }
    };

    while frac_part.len() > min_frac && frac_part.ends_with('0') {
        frac_part.pop();
    }

    if grouping {
        int_part = group_thousands(&int_part, options.locale.thousands_sep);
    }

    if frac_part.is_empty() {
        int_part
    } else {
        format!("{int_part}{}{frac_part}", options.locale.decimal_sep)
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let factor = 10_f64.powi(decimals as i32);
    let shifted = value * factor;
    // Values this large have no fractional digits left to round.
    if !shifted.is_finite() {
        return value;
    }
    shifted.round() / factor
}

fn group_thousands(int_part: &str, sep: char) -> String {
    let mut out = String::new();
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        let pos_from_end = len - i;
        out.push(ch);
        if pos_from_end > 1 && pos_from_end % 3 == 1 {
            out.push(sep);
        }
    }
    out
}
