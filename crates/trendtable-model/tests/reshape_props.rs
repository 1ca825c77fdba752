use std::collections::BTreeSet;

use proptest::prelude::*;
use trendtable_model::{reshape, sort, QueryCell, QueryRow, ReshapeOptions, SortDirection, SortTarget};

fn rows() -> impl Strategy<Value = Vec<QueryRow>> {
    prop::collection::vec(
        (prop::sample::select(vec!["a", "b", "c", "d", "e"]), -1e6f64..1e6, -1e6f64..1e6),
        0..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (label, x, y))| {
                vec![
                    QueryCell::new(label),
                    QueryCell::new(format!("p{idx}")),
                    QueryCell::new(x),
                    QueryCell::new(y),
                ]
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn one_entity_per_distinct_label(rows in rows()) {
        let table = reshape(&rows, &["x", "y"], &ReshapeOptions::default());
        let distinct: BTreeSet<String> = rows.iter().map(|row| row[0].value.display_text()).collect();
        prop_assert_eq!(table.entities.len(), distinct.len());

        let mut total = 0;
        for entity in &table.entities {
            prop_assert_eq!(entity.series.len(), 2);
            for series in &entity.series {
                prop_assert_eq!(series.len(), entity.dates.len());
            }
            total += entity.dates.len();
        }
        prop_assert_eq!(total, rows.len());
    }

    #[test]
    fn sorting_is_a_permutation(rows in rows(), descending in any::<bool>()) {
        let table = reshape(&rows, &["x", "y"], &ReshapeOptions::default());
        let direction = if descending { SortDirection::Descending } else { SortDirection::Ascending };
        let sorted = sort(&table.entities, SortTarget::Measure(1), direction);

        let mut ordinals: Vec<usize> = sorted.iter().map(|e| e.ordinal).collect();
        ordinals.sort_unstable();
        prop_assert_eq!(ordinals, (0..table.entities.len()).collect::<Vec<_>>());

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0].series[1][0], pair[1].series[1][0]);
            let ordered = if descending { a >= b } else { a <= b };
            prop_assert!(ordered);
        }
    }
}
