//! Query results as delivered by the dashboard host.

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Title used for the grouping column when the host supplies no header.
pub const DEFAULT_GROUP_TITLE: &str = "Category";

/// A flat query result: one row per (dimension, period) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryResult {
    pub data: Vec<QueryRow>,
    pub measure_headers: Vec<Header>,
    pub col_headers: Vec<Header>,
    pub row_headers: Vec<Header>,
}

pub type QueryRow = Vec<QueryCell>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub label: String,
}

/// One cell of a query row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryCell {
    #[serde(default)]
    pub value: CellValue,
    /// Host formatting hints. The first entry indexes the measure's conditional-formatting rules
    /// (`-1` when no rule matched).
    #[serde(default, rename = "f", skip_serializing_if = "Vec::is_empty")]
    pub formatting: Vec<i64>,
}

impl QueryCell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            formatting: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: i64) -> Self {
        self.formatting = vec![hint];
        self
    }

    /// The conditional-formatting hint (`f[0]`), if the host sent one.
    pub fn hint(&self) -> Option<i64> {
        self.formatting.first().copied()
    }
}

/// Raw cell payload. The host sends numbers, strings (numeric or not), booleans or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    #[default]
    Null,
}

impl CellValue {
    /// Numeric view of the cell: finite numbers, numeric strings and booleans (as 1/0).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Null => None,
        }
    }

    /// Display text of the cell, as used for date/period labels.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Number(n) => display_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Integral values print without a fractional part (`2024`, not `2024.0`).
pub(crate) fn display_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl QueryResult {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(LoadError::Query)
    }

    /// Labels of the measure headers, in query order.
    pub fn measure_labels(&self) -> Vec<&str> {
        self.measure_headers.iter().map(|h| h.label.as_str()).collect()
    }

    /// Title of the grouping column: the first column header, else the first row header.
    pub fn group_title(&self) -> String {
        self.col_headers
            .first()
            .or_else(|| self.row_headers.first())
            .map(|h| h.label.trim())
            .filter(|label| !label.is_empty())
            .unwrap_or(DEFAULT_GROUP_TITLE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_host_payload() {
        let json = r#"{
            "data": [
                [{"value": "East"}, {"value": "2024-01"}, {"value": "12.5", "f": [1]}, {"value": null}]
            ],
            "measureHeaders": [{"label": "Sales.Revenue"}, {"label": "Sales.Units"}],
            "rowHeaders": [{"label": "Region"}],
            "somethingElse": true
        }"#;
        let query = QueryResult::from_json(json).expect("parse query");
        assert_eq!(query.data.len(), 1);
        assert_eq!(query.data[0][2].value.as_number(), Some(12.5));
        assert_eq!(query.data[0][2].hint(), Some(1));
        assert_eq!(query.data[0][3].value, CellValue::Null);
        assert_eq!(query.measure_labels(), vec!["Sales.Revenue", "Sales.Units"]);
        assert_eq!(query.group_title(), "Region");
    }

    #[test]
    fn group_title_falls_back_to_category() {
        assert_eq!(QueryResult::default().group_title(), DEFAULT_GROUP_TITLE);
        let query = QueryResult {
            col_headers: vec![Header { label: "  ".into() }],
            ..QueryResult::default()
        };
        assert_eq!(query.group_title(), DEFAULT_GROUP_TITLE);
    }

    #[test]
    fn coerces_cell_values() {
        assert_eq!(CellValue::from("  7 ").as_number(), Some(7.0));
        assert_eq!(CellValue::from("n/a").as_number(), None);
        assert_eq!(CellValue::from(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Null.as_number(), None);
        assert_eq!(CellValue::from(2024).display_text(), "2024");
        assert_eq!(CellValue::from(1.5).display_text(), "1.5");
    }
}
