use serde::{Deserialize, Serialize};

/// How a series is reduced to the single number shown in a value cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Aggregation {
    #[default]
    Sum,
    Max,
    Min,
    Avg,
    /// The earliest value of the series.
    First,
}

impl Aggregation {
    /// Reduce `values`. An empty series aggregates to `0`.
    pub fn apply(self, values: &[f64]) -> f64 {
        let Some(&first) = values.first() else {
            return 0.0;
        };
        match self {
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Avg => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::First => first,
        }
    }
}

impl From<String> for Aggregation {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sum" => Aggregation::Sum,
            "max" => Aggregation::Max,
            "min" => Aggregation::Min,
            "avg" | "average" => Aggregation::Avg,
            "first" => Aggregation::First,
            other => {
                log::debug!("unknown aggregation method {other:?}, showing the first value");
                Aggregation::First
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_series() {
        let values = [3.0, -1.0, 4.0];
        assert_eq!(Aggregation::Sum.apply(&values), 6.0);
        assert_eq!(Aggregation::Max.apply(&values), 4.0);
        assert_eq!(Aggregation::Min.apply(&values), -1.0);
        assert_eq!(Aggregation::Avg.apply(&values), 2.0);
        assert_eq!(Aggregation::First.apply(&values), 3.0);
    }

    #[test]
    fn empty_series_is_zero() {
        for agg in [Aggregation::Sum, Aggregation::Max, Aggregation::Min, Aggregation::Avg, Aggregation::First] {
            assert_eq!(agg.apply(&[]), 0.0);
        }
    }

    #[test]
    fn parses_host_names() {
        assert_eq!(Aggregation::from("AVG".to_string()), Aggregation::Avg);
        assert_eq!(Aggregation::from("median".to_string()), Aggregation::First);
        let parsed: Aggregation = serde_json::from_str("\"max\"").expect("parse");
        assert_eq!(parsed, Aggregation::Max);
        assert_eq!(serde_json::to_string(&Aggregation::Min).expect("serialize"), "\"min\"");
    }
}
