use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Maximum absolute value of `measure` across every entity's series.
///
/// This is the denominator for diverging-bar widths. Returns `0` when no entity has values for
/// the measure. Always derived from the entities passed in, never cached.
pub fn compute_scale(entities: &[Entity], measure: usize) -> f64 {
    entities
        .iter()
        .flat_map(|entity| entity.series(measure).iter())
        .map(|value| value.abs())
        .filter(|value| value.is_finite())
        .fold(0.0, f64::max)
}

/// [`compute_scale`] for each of the first `measure_count` measures.
pub fn column_scales(entities: &[Entity], measure_count: usize) -> Vec<f64> {
    (0..measure_count)
        .map(|measure| compute_scale(entities, measure))
        .collect()
}

/// Widths of the two halves of a diverging bar, as percentages (0..=100) of the half width.
///
/// Negative values extend the left half, positive values the right half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BarExtent {
    pub negative: f64,
    pub positive: f64,
}

impl BarExtent {
    /// Bar for `value` against a column `scale`. A zero or non-finite scale yields no bar.
    pub fn for_value(value: f64, scale: f64) -> Self {
        if !value.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return Self::default();
        }
        let percentage = (value.abs() / scale * 100.0).min(100.0);
        if value > 0.0 {
            Self {
                negative: 0.0,
                positive: percentage,
            }
        } else if value < 0.0 {
            Self {
                negative: percentage,
                positive: 0.0,
            }
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::entity::EntityLabel;

    fn entity(label: &str, values: Vec<f64>) -> Entity {
        Entity {
            label: EntityLabel::from(label),
            ordinal: 0,
            dates: vec![String::new(); values.len()],
            hints: vec![None],
            series: vec![values],
        }
    }

    #[test]
    fn scale_is_max_absolute_value() {
        let entities = [entity("a", vec![1.0, -5.0, 3.0]), entity("b", vec![2.0, -2.0])];
        assert_eq!(compute_scale(&entities, 0), 5.0);
    }

    #[test]
    fn missing_or_empty_measures_scale_to_zero() {
        let entities = [entity("a", vec![]), entity("b", vec![0.0, 0.0])];
        assert_eq!(compute_scale(&entities, 0), 0.0);
        assert_eq!(compute_scale(&entities, 3), 0.0);
        assert_eq!(compute_scale(&[], 0), 0.0);
        assert_eq!(column_scales(&entities, 2), vec![0.0, 0.0]);
    }

    #[test]
    fn bars_split_by_sign() {
        assert_eq!(
            BarExtent::for_value(-2.5, 5.0),
            BarExtent {
                negative: 50.0,
                positive: 0.0
            }
        );
        assert_eq!(
            BarExtent::for_value(5.0, 5.0),
            BarExtent {
                negative: 0.0,
                positive: 100.0
            }
        );
        assert_eq!(BarExtent::for_value(0.0, 5.0), BarExtent::default());
    }

    #[test]
    fn zero_scale_draws_nothing() {
        assert_eq!(BarExtent::for_value(3.0, 0.0), BarExtent::default());
        assert_eq!(BarExtent::for_value(f64::NAN, 1.0), BarExtent::default());
    }
}
