//! `trendtable-model` turns a BI host's query result into a render-ready trend table.
//!
//! The pipeline is pure and synchronous:
//! - [`QueryResult`] is the host's JSON payload (rows of `{ "value": .., "f": [..] }` cells);
//! - [`reshape`] groups rows by the dimension value into [`Entity`] series;
//! - [`TableView`] holds the caller-owned display state (sort order, column widths);
//! - [`render_table`] resolves formatted text, colours, bar widths and sparklines.

#![forbid(unsafe_code)]

mod aggregate;
mod collation;
pub mod conditional_formatting;
mod entity;
mod error;
mod query;
pub mod render;
mod reshape;
mod scale;
mod settings;
pub mod sort;
mod view;

pub use aggregate::Aggregation;
pub use conditional_formatting::{CellStyle, Condition, ConditionOperator, ConditionalFormatting};
pub use entity::{Entity, EntityLabel, MeasureColumn, DEFAULT_MEASURE_TITLE};
pub use error::LoadError;
pub use query::{CellValue, Header, QueryCell, QueryResult, QueryRow, DEFAULT_GROUP_TITLE};
pub use render::{render_table, TableModel};
pub use reshape::{reshape, reshape_query, ReshapeOptions, ReshapedTable, MAX_MEASURE_COLUMNS, MAX_SERIES_LEN};
pub use scale::{column_scales, compute_scale, BarExtent};
pub use settings::{DatePart, TableSettings};
pub use sort::{sort, SortDirection, SortOrder, SortState, SortTarget};
pub use view::{default_column_widths, TableEvent, TableView};
