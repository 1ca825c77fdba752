//! Render-ready table model.
//!
//! [`render_table`] resolves everything a drawing layer needs (header titles, formatted text,
//! colours, bar widths and sparkline data) so that the host only has to paint.

use serde::Serialize;
use trendtable_format::FormatSpec;

use crate::conditional_formatting::{CellStyle, ConditionalFormatting};
use crate::scale::BarExtent;
use crate::settings::TableSettings;
use crate::sort::{SortOrder, SortTarget};
use crate::view::TableView;

pub const ROW_BACKGROUND: &str = "#ffffff";
pub const ALTERNATE_ROW_BACKGROUND: &str = "#f5f5f5";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableModel {
    pub header: HeaderModel,
    pub rows: Vec<RowModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderModel {
    pub group_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_sort: Option<SortOrder>,
    pub show_row_numbers: bool,
    pub measures: Vec<MeasureHeader>,
}

/// Header cells of one measure. A title is `None` when that column is hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureHeader {
    pub measure: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    pub value_title: Option<String>,
    pub bar_title: Option<String>,
    pub sparkline_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowModel {
    /// 1-based, present only when row numbers are shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_number: Option<usize>,
    pub label: String,
    pub background: String,
    pub cells: Vec<CellModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellModel {
    pub measure: usize,
    /// The aggregated series value.
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub style: CellStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar: Option<BarExtent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparkline: Option<Sparkline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sparkline {
    /// Popup title, `"<label> <measure title>"`.
    pub title: String,
    pub values: Vec<f64>,
    pub dates: Vec<String>,
}

pub fn render_table(view: &TableView, settings: &TableSettings, formatting: &ConditionalFormatting) -> TableModel {
    let sort = view.sort_state();
    let columns = view.measure_columns();
    let scales = view.scales();
    let options = settings.format_options();
    let specs: Vec<FormatSpec> = columns.iter().map(|column| FormatSpec::parse(&column.format)).collect();

    let header = HeaderModel {
        group_title: view.table().group_title.clone(),
        group_sort: sort.indicator(SortTarget::Label),
        show_row_numbers: settings.show_row_numbers,
        measures: columns
            .iter()
            .map(|column| {
                let titled = |show: bool, suffix: &str| show.then(|| format!("{} {suffix}", column.title));
                MeasureHeader {
                    measure: column.index,
                    title: column.title.clone(),
                    sort: sort.indicator(SortTarget::Measure(column.index)),
                    value_title: titled(settings.show_value_columns, "Value"),
                    bar_title: titled(settings.show_bar_charts, "Bar Chart"),
                    sparkline_title: titled(settings.show_line_charts, "Sparkline"),
                }
            })
            .collect(),
    };

    let rows = view
        .entities()
        .iter()
        .enumerate()
        .map(|(row, entity)| {
            let label = entity.label.to_string();
            let cells = columns
                .iter()
                .zip(&specs)
                .map(|(column, spec)| {
                    let measure = column.index;
                    let series = entity.series(measure);
                    let value = settings.aggregation_method.apply(series);
                    let scale = scales.get(measure).copied().unwrap_or(0.0);

                    CellModel {
                        measure,
                        value,
                        text: settings.show_value_columns.then(|| spec.format(value, &options)),
                        style: formatting.resolve_cell(value, measure, entity.hint(measure), &settings.cell_font_color),
                        bar: settings
                            .show_bar_charts
                            .then(|| BarExtent::for_value(entity.first_value(measure).unwrap_or(0.0), scale)),
                        sparkline: settings.show_line_charts.then(|| Sparkline {
                            title: format!("{label} {}", column.title),
                            values: series.to_vec(),
                            dates: entity.dates.clone(),
                        }),
                    }
                })
                .collect();

            RowModel {
                row_number: settings.show_row_numbers.then_some(row + 1),
                label,
                background: row_background(row, settings.alternating_row_colors).to_string(),
                cells,
            }
        })
        .collect();

    TableModel { header, rows }
}

/// Background of the 0-based display row `row`.
pub fn row_background(row: usize, alternating: bool) -> &'static str {
    if alternating && row % 2 == 1 {
        ALTERNATE_ROW_BACKGROUND
    } else {
        ROW_BACKGROUND
    }
}
