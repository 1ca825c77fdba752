use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::query::{display_number, CellValue};

/// Title used for a measure column whose header has no usable segment.
pub const DEFAULT_MEASURE_TITLE: &str = "Data";

/// The distinct grouping-dimension value that identifies an [`Entity`].
///
/// Numeric and text labels never compare equal to each other, so `1` and `"1"` form two groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityLabel {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl EntityLabel {
    /// Label for a dimension cell. `null` cells group under the empty label.
    pub fn from_cell(value: &CellValue) -> Self {
        match value {
            CellValue::Number(n) => EntityLabel::Number(OrderedFloat(*n)),
            CellValue::Text(s) => EntityLabel::Text(s.clone()),
            CellValue::Bool(b) => EntityLabel::Text(b.to_string()),
            CellValue::Null => EntityLabel::Text(String::new()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            EntityLabel::Number(n) => Some(n.into_inner()),
            EntityLabel::Text(_) => None,
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Number(n) => f.write_str(&display_number(n.into_inner())),
            EntityLabel::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for EntityLabel {
    fn from(value: &str) -> Self {
        EntityLabel::Text(value.to_string())
    }
}

impl From<f64> for EntityLabel {
    fn from(value: f64) -> Self {
        EntityLabel::Number(OrderedFloat(value))
    }
}

/// One table row after reshaping: a distinct dimension value and its per-measure time series.
///
/// `series[m]` and `dates` are index-aligned for every measure `m`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub label: EntityLabel,
    /// Position of the label's first occurrence among the source rows' distinct labels.
    pub ordinal: usize,
    pub series: Vec<Vec<f64>>,
    pub dates: Vec<String>,
    /// Host formatting hint of the first retained row, per measure.
    pub hints: Vec<Option<i64>>,
}

impl Entity {
    /// The series for `measure`, or an empty slice when the entity has none.
    pub fn series(&self, measure: usize) -> &[f64] {
        self.series.get(measure).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First (earliest) value of `measure`. This drives bars and measure sorting.
    pub fn first_value(&self, measure: usize) -> Option<f64> {
        self.series(measure).first().copied()
    }

    pub fn hint(&self, measure: usize) -> Option<i64> {
        self.hints.get(measure).copied().flatten()
    }
}

/// A measure tracked per entity, identified by its position in the query's measure headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureColumn {
    pub index: usize,
    pub title: String,
    /// Normalized number format pattern for the column's values.
    pub format: String,
}

impl MeasureColumn {
    /// Display title for a header label such as `"Sales.Revenue"`: the last dot-separated segment.
    pub fn title_from_label(label: &str) -> String {
        let segment = label.rsplit('.').next().unwrap_or("").trim();
        if segment.is_empty() {
            DEFAULT_MEASURE_TITLE.to_string()
        } else {
            segment.to_string()
        }
    }
}
