//! Grouping a flat query result into per-entity time series.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use trendtable_format::DEFAULT_FORMAT;

use crate::entity::{Entity, EntityLabel, MeasureColumn};
use crate::query::{QueryCell, QueryResult, QueryRow, DEFAULT_GROUP_TITLE};
use crate::settings::TableSettings;

/// Longest series retained per entity and measure.
pub const MAX_SERIES_LEN: usize = 500;
/// Most measure columns a table shows.
pub const MAX_MEASURE_COLUMNS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshapeOptions {
    /// Cell index of the date/period label, if the query has one. Index 0 is always the
    /// grouping dimension.
    pub date_column: Option<usize>,
    pub max_series_len: usize,
    pub max_measure_columns: usize,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            date_column: Some(1),
            max_series_len: MAX_SERIES_LEN,
            max_measure_columns: MAX_MEASURE_COLUMNS,
        }
    }
}

impl ReshapeOptions {
    /// Cell index of measure `measure`: the row's cells minus the dimension and date cells.
    fn cell_index(&self, measure: usize) -> usize {
        let idx = measure + 1;
        match self.date_column {
            Some(date) if date >= 1 && date <= idx => idx + 1,
            _ => idx,
        }
    }
}

/// The render-independent model of a table: entities in source order plus their columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshapedTable {
    /// Title of the grouping column.
    pub group_title: String,
    pub entities: Vec<Entity>,
    pub measure_columns: Vec<MeasureColumn>,
}

/// Group `rows` by their dimension cell into entities, one per distinct value in first-seen order.
///
/// Each entity gets one series per measure (capped at `options.max_measure_columns` measures)
/// built from its rows in order, with missing or non-numeric cells read as `0`, plus the
/// index-aligned date labels. Rows beyond `options.max_series_len` for an entity are dropped.
pub fn reshape<S: AsRef<str>>(rows: &[QueryRow], measure_labels: &[S], options: &ReshapeOptions) -> ReshapedTable {
    let measure_count = measure_labels.len().min(options.max_measure_columns);
    if measure_labels.len() > measure_count {
        log::debug!(
            "query has {} measures, keeping the first {measure_count}",
            measure_labels.len()
        );
    }

    let mut slots: HashMap<EntityLabel, usize> = HashMap::new();
    let mut entities: Vec<Entity> = Vec::new();
    let mut defaulted = 0usize;
    let mut dropped = 0usize;

    for row in rows {
        let label = row
            .first()
            .map(|cell| EntityLabel::from_cell(&cell.value))
            .unwrap_or_else(|| EntityLabel::Text(String::new()));

        let slot = match slots.get(&label) {
            Some(&slot) => slot,
            None => {
                let slot = entities.len();
                entities.push(Entity {
                    label: label.clone(),
                    ordinal: slot,
                    series: vec![Vec::new(); measure_count],
                    dates: Vec::new(),
                    hints: vec![None; measure_count],
                });
                slots.insert(label, slot);
                slot
            }
        };

        let entity = &mut entities[slot];
        if entity.dates.len() >= options.max_series_len {
            dropped += 1;
            continue;
        }

        let date = options
            .date_column
            .and_then(|idx| row.get(idx))
            .map(|cell| cell.value.display_text())
            .unwrap_or_default();
        entity.dates.push(date);

        for measure in 0..measure_count {
            let cell = row.get(options.cell_index(measure));
            let value = match cell.and_then(|cell| cell.value.as_number()) {
                Some(value) => value,
                None => {
                    defaulted += 1;
                    0.0
                }
            };
            let series = &mut entity.series[measure];
            if series.is_empty() {
                entity.hints[measure] = cell.and_then(QueryCell::hint);
            }
            series.push(value);
        }
    }

    if defaulted > 0 || dropped > 0 {
        log::debug!(
            "reshaped {} rows into {} entities: {defaulted} measure cells read as 0, {dropped} rows past the {}-point cap dropped",
            rows.len(),
            entities.len(),
            options.max_series_len
        );
    }

    let measure_columns = measure_labels
        .iter()
        .take(measure_count)
        .enumerate()
        .map(|(index, label)| MeasureColumn {
            index,
            title: MeasureColumn::title_from_label(label.as_ref()),
            format: DEFAULT_FORMAT.to_string(),
        })
        .collect();

    ReshapedTable {
        group_title: DEFAULT_GROUP_TITLE.to_string(),
        entities,
        measure_columns,
    }
}

/// Reshape a host query result, taking the grouping title from its headers and the column
/// formats from `settings`.
pub fn reshape_query(query: &QueryResult, settings: &TableSettings, options: &ReshapeOptions) -> ReshapedTable {
    let mut table = reshape(&query.data, &query.measure_labels(), options);
    table.group_title = query.group_title();
    for column in &mut table.measure_columns {
        column.format = settings.format_for(column.index);
    }
    table
}
