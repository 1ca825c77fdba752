//! Threshold-based text colours for value cells.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::LoadError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    LessThan,
    GreaterThan,
    Equal,
    LessThanOrEqual,
    GreaterThanOrEqual,
    /// An operator this crate does not understand. Conditions using it never match.
    Unsupported(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::LessThan => "<",
            ConditionOperator::GreaterThan => ">",
            ConditionOperator::Equal => "=",
            ConditionOperator::LessThanOrEqual => "<=",
            ConditionOperator::GreaterThanOrEqual => ">=",
            ConditionOperator::Unsupported(op) => op,
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(value: String) -> Self {
        match value.trim() {
            "<" => ConditionOperator::LessThan,
            ">" => ConditionOperator::GreaterThan,
            "=" | "==" => ConditionOperator::Equal,
            "<=" => ConditionOperator::LessThanOrEqual,
            ">=" => ConditionOperator::GreaterThanOrEqual,
            _ => ConditionOperator::Unsupported(value),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(value: ConditionOperator) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conditional-formatting rule: `value <operator> threshold` selects `color`.
///
/// Every field tolerates a missing or mistyped value, so an incomplete rule decodes and simply
/// never matches instead of discarding its neighbours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Threshold as sent by the host; it must parse as a float for the rule to ever match.
    #[serde(default, deserialize_with = "threshold_text")]
    pub threshold_value: String,
    #[serde(default = "missing_operator", deserialize_with = "operator_or_unsupported")]
    pub operator: ConditionOperator,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub color: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Condition {
    pub fn new(operator: &str, threshold: impl ToString, color: &str) -> Self {
        Self {
            threshold_value: threshold.to_string(),
            operator: ConditionOperator::from(operator.to_string()),
            color: color.to_string(),
            background_color: None,
        }
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold_value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| !t.is_nan())
    }

    /// Whether `value` passes this rule. `=` is exact floating-point equality.
    pub fn matches(&self, value: f64) -> bool {
        let Some(threshold) = self.threshold() else {
            warn_once(format!("unparseable threshold {:?}", self.threshold_value));
            return false;
        };
        match &self.operator {
            ConditionOperator::LessThan => value < threshold,
            ConditionOperator::GreaterThan => value > threshold,
            ConditionOperator::Equal => value == threshold,
            ConditionOperator::LessThanOrEqual => value <= threshold,
            ConditionOperator::GreaterThanOrEqual => value >= threshold,
            ConditionOperator::Unsupported(op) => {
                warn_once(format!("unsupported operator {op:?}"));
                false
            }
        }
    }
}

/// Hosts send thresholds either as strings or as bare numbers; anything else never matches.
fn threshold_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn missing_operator() -> ConditionOperator {
    ConditionOperator::Unsupported(String::new())
}

fn operator_or_unsupported<'de, D>(deserializer: D) -> Result<ConditionOperator, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(op) => ConditionOperator::from(op),
        Value::Null => missing_operator(),
        other => ConditionOperator::Unsupported(other.to_string()),
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Rule lists keep every entry that is an object; other entries are dropped.
fn lenient_rules<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<Condition>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(binding, rules)| {
            let rules = match rules {
                Value::Array(rules) => rules
                    .into_iter()
                    .filter_map(|rule| match serde_json::from_value::<Condition>(rule) {
                        Ok(condition) => Some(condition),
                        Err(err) => {
                            log::debug!("dropping conditional formatting rule for {binding:?}: {err}");
                            None
                        }
                    })
                    .collect(),
                other => {
                    log::debug!("conditional formatting rules for {binding:?} are not a list: {other}");
                    Vec::new()
                }
            };
            (binding, rules)
        })
        .collect())
}

fn warn_once(message: String) {
    static WARNED: OnceLock<Mutex<BTreeSet<String>>> = OnceLock::new();

    let warned = WARNED.get_or_init(|| Mutex::new(BTreeSet::new()));
    let mut warned = match warned.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if warned.insert(message.clone()) {
        log::warn!("conditional formatting rule never matches: {message}");
    }
}

/// The first condition in `conditions` that `value` passes.
pub fn first_match(value: f64, conditions: &[Condition]) -> Option<&Condition> {
    conditions.iter().find(|condition| condition.matches(value))
}

/// Colour of the first condition `value` passes, or `default_color`.
///
/// Conditions are evaluated in order and the first match wins, even if a later one is a closer fit.
pub fn resolve_color<'a>(value: f64, conditions: &'a [Condition], default_color: &'a str) -> &'a str {
    match first_match(value, conditions) {
        Some(condition) if !condition.color.is_empty() => condition.color.as_str(),
        _ => default_color,
    }
}

/// Resolved text and background colour of a cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl CellStyle {
    fn plain(color: &str) -> Self {
        Self {
            color: color.to_string(),
            background_color: None,
        }
    }

    fn from_condition(condition: &Condition, default_color: &str) -> Self {
        let color = if condition.color.is_empty() {
            default_color
        } else {
            condition.color.as_str()
        };
        Self {
            color: color.to_string(),
            background_color: condition.background_color.clone(),
        }
    }
}

/// Conditional-formatting rules for a table, as configured in the host.
///
/// Each measure index is bound to a host-assigned binding identifier, and each binding has an
/// ordered rule list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalFormatting {
    pub bindings: BTreeMap<usize, String>,
    #[serde(deserialize_with = "lenient_rules")]
    pub settings: BTreeMap<String, Vec<Condition>>,
}

impl ConditionalFormatting {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(LoadError::ConditionalFormatting)
    }

    /// Bind `conditions` to `measure` under the identifier `binding`.
    pub fn bind(&mut self, measure: usize, binding: impl Into<String>, conditions: Vec<Condition>) {
        let binding = binding.into();
        self.bindings.insert(measure, binding.clone());
        self.settings.insert(binding, conditions);
    }

    /// The ordered rules for `measure`; empty when the measure has no binding.
    pub fn conditions(&self, measure: usize) -> &[Condition] {
        self.bindings
            .get(&measure)
            .and_then(|binding| self.settings.get(binding))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Colour of `value` in `measure` by evaluating its rules in order.
    pub fn resolve_color<'a>(&'a self, value: f64, measure: usize, default_color: &'a str) -> &'a str {
        resolve_color(value, self.conditions(measure), default_color)
    }

    /// Style for a value cell.
    ///
    /// A host hint takes precedence: `-1` means no rule matched, `i >= 0` selects rule `i` of
    /// the measure. Without a hint the rules are evaluated against `value`.
    pub fn resolve_cell(&self, value: f64, measure: usize, hint: Option<i64>, default_color: &str) -> CellStyle {
        let conditions = self.conditions(measure);
        match hint {
            Some(hint) if hint < 0 => CellStyle::plain(default_color),
            Some(hint) => match usize::try_from(hint).ok().and_then(|idx| conditions.get(idx)) {
                Some(condition) => CellStyle::from_condition(condition, default_color),
                None => {
                    log::warn!(
                        "formatting hint {hint} is out of range for measure {measure} ({} rules)",
                        conditions.len()
                    );
                    CellStyle::plain(default_color)
                }
            },
            None => match first_match(value, conditions) {
                Some(condition) => CellStyle::from_condition(condition, default_color),
                None => CellStyle::plain(default_color),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operators() {
        assert_eq!(ConditionOperator::from("<=".to_string()), ConditionOperator::LessThanOrEqual);
        assert_eq!(
            ConditionOperator::from("between".to_string()),
            ConditionOperator::Unsupported("between".to_string())
        );
    }

    #[test]
    fn unparseable_threshold_never_matches() {
        let condition = Condition::new(">", "lots", "red");
        assert_eq!(condition.threshold(), None);
        assert!(!condition.matches(1e9));
    }

    #[test]
    fn incomplete_rules_decode_and_never_match() {
        let formatting = ConditionalFormatting::from_json(
            r#"{
                "bindings": {"0": "rev"},
                "settings": {"rev": [
                    {"thresholdValue": "10"},
                    {"operator": ">", "color": "blue"},
                    {"thresholdValue": null, "operator": 7, "color": null},
                    "not a rule",
                    {"thresholdValue": 0, "operator": ">", "color": "green", "backgroundColor": 3}
                ]}
            }"#,
        )
        .expect("parse conditional formatting");

        let conditions = formatting.conditions(0);
        assert_eq!(conditions.len(), 4);
        assert_eq!(conditions[0].operator, ConditionOperator::Unsupported(String::new()));
        assert_eq!(conditions[1].threshold(), None);
        assert_eq!(conditions[2].color, "");
        assert_eq!(conditions[3].background_color, None);
        assert_eq!(formatting.resolve_color(50.0, 0, "black"), "green");
    }

    #[test]
    fn equality_is_exact() {
        let condition = Condition::new("=", 0.3, "red");
        assert!(condition.matches(0.3));
        assert!(!condition.matches(0.1 + 0.2));
    }
}
