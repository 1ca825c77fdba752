use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::collation::compare_text;
use crate::entity::{Entity, EntityLabel};

/// The column a sort applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortTarget {
    /// The grouping column (entity labels).
    Label,
    /// A measure column, by measure index.
    Measure(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Requested ordering for [`sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
    /// First-seen order of the labels in the source rows.
    OriginalOrder,
}

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => SortDirection::Ascending,
            SortOrder::Descending => SortDirection::Descending,
        }
    }
}

/// Which column is sorted and how.
///
/// Toggling the same column cycles unsorted -> descending -> ascending -> unsorted; toggling a
/// different column starts over at descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<SortTarget>,
    pub order: Option<SortOrder>,
}

impl SortState {
    #[must_use]
    pub fn toggle(self, target: SortTarget) -> Self {
        let order = if self.column == Some(target) {
            match self.order {
                None => Some(SortOrder::Descending),
                Some(SortOrder::Descending) => Some(SortOrder::Ascending),
                Some(SortOrder::Ascending) => None,
            }
        } else {
            Some(SortOrder::Descending)
        };

        Self {
            column: order.map(|_| target),
            order,
        }
    }

    /// The direction to apply to the entities for this state.
    pub fn direction(&self) -> SortDirection {
        self.order.map(SortDirection::from).unwrap_or(SortDirection::OriginalOrder)
    }

    /// The sort indicator to show on `target`'s header, if it is the sorted column.
    pub fn indicator(&self, target: SortTarget) -> Option<SortOrder> {
        if self.column == Some(target) {
            self.order
        } else {
            None
        }
    }
}

/// Compare entity labels: numbers numerically, text by locale-aware comparison, and every number
/// before every text label so mixed columns still have a total order.
pub fn compare_labels(a: &EntityLabel, b: &EntityLabel) -> Ordering {
    match (a, b) {
        (EntityLabel::Number(x), EntityLabel::Number(y)) => x.cmp(y),
        (EntityLabel::Number(_), EntityLabel::Text(_)) => Ordering::Less,
        (EntityLabel::Text(_), EntityLabel::Number(_)) => Ordering::Greater,
        (EntityLabel::Text(x), EntityLabel::Text(y)) => compare_text(x, y),
    }
}

/// The permutation of `entities` for `target` and `direction`.
///
/// Ties keep their source order (first-seen position), whatever the current order. Measure sorts
/// compare each entity's first value of the measure, reading a missing value as `0`. [`SortDirection::OriginalOrder`] orders by each
/// entity's first-seen position and ignores `target`.
pub fn sort_permutation(entities: &[Entity], target: SortTarget, direction: SortDirection) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entities.len()).collect();

    let descending = match direction {
        SortDirection::OriginalOrder => {
            order.sort_by_key(|&idx| entities[idx].ordinal);
            return order;
        }
        SortDirection::Ascending => false,
        SortDirection::Descending => true,
    };

    order.sort_by(|&a, &b| {
        let ord = match target {
            SortTarget::Label => compare_labels(&entities[a].label, &entities[b].label),
            SortTarget::Measure(measure) => {
                let x = entities[a].first_value(measure).unwrap_or(0.0);
                let y = entities[b].first_value(measure).unwrap_or(0.0);
                x.total_cmp(&y)
            }
        };
        let ord = if descending { ord.reverse() } else { ord };
        ord.then_with(|| entities[a].ordinal.cmp(&entities[b].ordinal))
    });
    order
}

/// A reordered copy of `entities`. Entity contents are never modified.
pub fn sort(entities: &[Entity], target: SortTarget, direction: SortDirection) -> Vec<Entity> {
    sort_permutation(entities, target, direction)
        .into_iter()
        .map(|idx| entities[idx].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_cycles_through_orders() {
        let label = SortTarget::Label;
        let desc = SortState::default().toggle(label);
        assert_eq!(desc.order, Some(SortOrder::Descending));
        let asc = desc.toggle(label);
        assert_eq!(asc.order, Some(SortOrder::Ascending));
        let none = asc.toggle(label);
        assert_eq!(none, SortState::default());
        assert_eq!(none.direction(), SortDirection::OriginalOrder);
    }

    #[test]
    fn switching_columns_restarts_at_descending() {
        let state = SortState::default()
            .toggle(SortTarget::Measure(0))
            .toggle(SortTarget::Measure(0))
            .toggle(SortTarget::Measure(1));
        assert_eq!(
            state,
            SortState {
                column: Some(SortTarget::Measure(1)),
                order: Some(SortOrder::Descending),
            }
        );
        assert_eq!(state.indicator(SortTarget::Measure(1)), Some(SortOrder::Descending));
        assert_eq!(state.indicator(SortTarget::Measure(0)), None);
    }

    #[test]
    fn numbers_sort_before_text() {
        assert_eq!(compare_labels(&EntityLabel::from(10.0), &EntityLabel::from(9.0)), Ordering::Greater);
        assert_eq!(compare_labels(&EntityLabel::from(10.0), &EntityLabel::from("9")), Ordering::Less);
        assert_eq!(compare_labels(&EntityLabel::from("10"), &EntityLabel::from(9.0)), Ordering::Greater);
    }

    fn entity(label: EntityLabel, ordinal: usize, value: f64) -> Entity {
        Entity {
            label,
            ordinal,
            series: vec![vec![value]],
            dates: vec![String::new()],
            hints: vec![None],
        }
    }

    #[test]
    fn mixed_label_columns_sort_without_panicking() {
        let entities: Vec<Entity> = (0..60)
            .map(|n| {
                let label = if n % 2 == 0 {
                    EntityLabel::from(f64::from(n % 17))
                } else {
                    EntityLabel::Text((n % 13).to_string())
                };
                entity(label, n as usize, 0.0)
            })
            .collect();

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sorted = sort(&entities, SortTarget::Label, direction);
            assert_eq!(sorted.len(), entities.len());
            let split = sorted
                .iter()
                .position(|e| matches!(e.label, EntityLabel::Text(_)) == (direction == SortDirection::Ascending))
                .unwrap_or(sorted.len());
            for pair in sorted.windows(2) {
                let ord = compare_labels(&pair[0].label, &pair[1].label);
                match direction {
                    SortDirection::Ascending => assert_ne!(ord, Ordering::Greater),
                    _ => assert_ne!(ord, Ordering::Less),
                }
            }
            assert_eq!(split, 30);
        }
    }

    #[test]
    fn ties_fall_back_to_source_order() {
        let entities = vec![
            entity(EntityLabel::from("b"), 0, 1.0),
            entity(EntityLabel::from("a"), 1, 1.0),
            entity(EntityLabel::from("c"), 2, 5.0),
        ];
        let by_label = sort(&entities, SortTarget::Label, SortDirection::Ascending);
        let by_value = sort(&by_label, SortTarget::Measure(0), SortDirection::Descending);
        let labels: Vec<String> = by_value.iter().map(|e| e.label.to_string()).collect();
        assert_eq!(labels, vec!["c", "b", "a"]);
    }
}
