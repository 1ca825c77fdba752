use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trendtable_format::{normalize_pattern, FormatOptions, Locale};

use crate::aggregate::Aggregation;
use crate::error::LoadError;

/// Table options configured in the dashboard host.
///
/// Every recognised option has a documented default; missing keys take the default and unknown
/// keys are ignored. Keys are camelCase, matching the host's settings object. [`from_json`]
/// additionally tolerates mistyped values key by key.
///
/// [`from_json`]: TableSettings::from_json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableSettings {
    pub table_border_color: String,
    /// Alternate white / light-grey row backgrounds.
    pub alternating_row_colors: bool,
    pub table_border_radius: f64,
    pub table_border_width: f64,
    pub show_value_columns: bool,
    pub show_bar_charts: bool,
    pub show_line_charts: bool,
    pub show_row_numbers: bool,
    /// Date granularity requested from the host query.
    pub date_part: DatePart,
    pub positive_bar_color: String,
    pub negative_bar_color: String,
    #[serde(alias = "barCornerRounding")]
    pub bar_rounding: f64,
    pub sparkline_color: String,
    pub header_font_family: String,
    pub header_font_size: f64,
    pub header_font_weight: u16,
    pub header_font_color: String,
    #[serde(alias = "valueFontFamily")]
    pub cell_font_family: String,
    pub cell_font_size: f64,
    pub cell_font_weight: u16,
    /// Default text colour of value cells, used when no conditional rule applies.
    #[serde(alias = "valueFontColor")]
    pub cell_font_color: String,
    /// Text colour of the grouping-column cells.
    pub row_font_color: String,
    /// Per-measure number format overrides, by measure index. `null`/`auto` use the default.
    pub measure_formats: Vec<Option<String>>,
    pub aggregation_method: Aggregation,
    /// Locale tag for decimal/thousands separators.
    pub number_locale: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            table_border_color: "#cfd5da".to_string(),
            alternating_row_colors: true,
            table_border_radius: 10.0,
            table_border_width: 0.5,
            show_value_columns: true,
            show_bar_charts: true,
            show_line_charts: true,
            show_row_numbers: false,
            date_part: DatePart::default(),
            positive_bar_color: "#00FF00".to_string(),
            negative_bar_color: "#FF0000".to_string(),
            bar_rounding: 10.0,
            sparkline_color: "blue".to_string(),
            header_font_family: "Arial".to_string(),
            header_font_size: 12.0,
            header_font_weight: 600,
            header_font_color: "#21314d".to_string(),
            cell_font_family: "Arial".to_string(),
            cell_font_size: 12.0,
            cell_font_weight: 400,
            cell_font_color: "#393e41".to_string(),
            row_font_color: "#5f6972".to_string(),
            measure_formats: Vec::new(),
            aggregation_method: Aggregation::default(),
            number_locale: "en-US".to_string(),
        }
    }
}

impl TableSettings {
    /// Decode the host's settings object.
    ///
    /// Only malformed JSON is an error. A key whose value has the wrong type is coerced when it is
    /// a numeric or boolean string (`"14"`, `"false"`) or a number where text is expected, and
    /// otherwise keeps its default. A document that is not an object (e.g. `null`) yields the
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json).map_err(LoadError::Settings)?;
        let Value::Object(map) = value else {
            log::debug!("settings document is not an object, using defaults");
            return Ok(Self::default());
        };
        serde_json::from_value(Value::Object(usable_keys(map))).map_err(LoadError::Settings)
    }

    /// The normalized format pattern for `measure`.
    pub fn format_for(&self, measure: usize) -> String {
        let pattern = self.measure_formats.get(measure).and_then(Option::as_deref);
        normalize_pattern(pattern)
    }

    /// Formatter options for the configured locale; unknown tags fall back to `en-US`.
    pub fn format_options(&self) -> FormatOptions {
        let locale = Locale::for_tag(&self.number_locale).unwrap_or_else(|| {
            log::debug!("unknown number locale {:?}, using en-US", self.number_locale);
            Locale::en_us()
        });
        FormatOptions::with_locale(locale)
    }
}

/// `map` with every value that does not decode for its key coerced or removed.
fn usable_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| {
            if accepts(&key, &value) {
                return Some((key, value));
            }
            if let Some(coerced) = coerce(&value).filter(|coerced| accepts(&key, coerced)) {
                return Some((key, coerced));
            }
            log::debug!("ignoring setting {key:?}: unusable value {value}");
            None
        })
        .collect()
}

fn accepts(key: &str, value: &Value) -> bool {
    let mut single = Map::new();
    single.insert(key.to_string(), value.clone());
    serde_json::from_value::<TableSettings>(Value::Object(single)).is_ok()
}

fn coerce(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            if let Ok(flag) = text.parse::<bool>() {
                Some(Value::Bool(flag))
            } else if let Ok(int) = text.parse::<i64>() {
                Some(Value::from(int))
            } else {
                text.parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
            }
        }
        Value::Number(number) => Some(Value::String(number.to_string())),
        _ => None,
    }
}

/// Date granularity of the period column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DatePart {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}
