use serde::{Deserialize, Serialize};

use crate::entity::{Entity, MeasureColumn};
use crate::reshape::ReshapedTable;
use crate::scale::column_scales;
use crate::sort::{sort, SortDirection, SortOrder, SortState, SortTarget};

/// Default width of the grouping column, in pixels.
pub const GROUP_COLUMN_WIDTH: f64 = 150.0;
/// Default width of each value, bar and sparkline column, in pixels.
pub const MEASURE_COLUMN_WIDTH: f64 = 200.0;
/// Each measure is shown as a value, a bar and a sparkline column.
pub const COLUMNS_PER_MEASURE: usize = 3;

/// A user action or data change applied to a [`TableView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableEvent {
    /// Replace the data, e.g. after the host re-ran the query.
    Load(ReshapedTable),
    /// Advance the sort cycle of a column header.
    ToggleSort(SortTarget),
    /// Sort in an explicit direction.
    Sort {
        target: SortTarget,
        direction: SortDirection,
    },
    /// Set the width of a display column (0 is the grouping column, then value/bar/sparkline
    /// triples per measure).
    ResizeColumn { index: usize, width: f64 },
    /// Restore source order, clear the sort and restore default column widths.
    Reset,
}

/// Caller-owned table state. Entities are kept in display order; scales are derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    table: ReshapedTable,
    sort: SortState,
    column_widths: Vec<f64>,
}

impl TableView {
    pub fn new(table: ReshapedTable) -> Self {
        let column_widths = default_column_widths(table.measure_columns.len());
        Self {
            table,
            sort: SortState::default(),
            column_widths,
        }
    }

    pub fn table(&self) -> &ReshapedTable {
        &self.table
    }

    /// Entities in their current display order.
    pub fn entities(&self) -> &[Entity] {
        &self.table.entities
    }

    pub fn measure_columns(&self) -> &[MeasureColumn] {
        &self.table.measure_columns
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    /// Bar scale per measure column, computed from the current entities.
    pub fn scales(&self) -> Vec<f64> {
        column_scales(&self.table.entities, self.table.measure_columns.len())
    }

    pub fn apply(&mut self, event: TableEvent) {
        match event {
            TableEvent::Load(table) => *self = Self::new(table),
            TableEvent::ToggleSort(target) => {
                let next = self.sort.toggle(target);
                self.reorder(target, next.direction());
                self.sort = next;
            }
            TableEvent::Sort { target, direction } => {
                self.reorder(target, direction);
                self.sort = match direction {
                    SortDirection::Ascending => SortState {
                        column: Some(target),
                        order: Some(SortOrder::Ascending),
                    },
                    SortDirection::Descending => SortState {
                        column: Some(target),
                        order: Some(SortOrder::Descending),
                    },
                    SortDirection::OriginalOrder => SortState::default(),
                };
            }
            TableEvent::ResizeColumn { index, width } => match self.column_widths.get_mut(index) {
                Some(slot) if width.is_finite() => *slot = width.max(0.0),
                _ => log::debug!("ignoring resize of column {index} to {width}"),
            },
            TableEvent::Reset => {
                self.reorder(SortTarget::Label, SortDirection::OriginalOrder);
                self.sort = SortState::default();
                self.column_widths = default_column_widths(self.table.measure_columns.len());
            }
        }
    }

    fn reorder(&mut self, target: SortTarget, direction: SortDirection) {
        self.table.entities = sort(&self.table.entities, target, direction);
    }
}

/// Grouping column followed by a value, bar and sparkline column per measure.
pub fn default_column_widths(measure_count: usize) -> Vec<f64> {
    let mut widths = Vec::with_capacity(1 + measure_count * COLUMNS_PER_MEASURE);
    widths.push(GROUP_COLUMN_WIDTH);
    widths.extend(std::iter::repeat(MEASURE_COLUMN_WIDTH).take(measure_count * COLUMNS_PER_MEASURE));
    widths
}
