//! Plain-text rendering of a [`TableModel`] for terminals.

use std::fmt::Write as _;

use trendtable_model::render::{CellModel, MeasureHeader};
use trendtable_model::{BarExtent, SortOrder, TableModel};

/// Characters per half of a diverging bar.
const BAR_HALF_WIDTH: usize = 10;
const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render_text(model: &TableModel) -> String {
    let header = &model.header;
    let label_width = model
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .chain(std::iter::once(header.group_title.chars().count() + 2))
        .max()
        .unwrap_or(0);
    let number_width = if header.show_row_numbers {
        model.rows.len().to_string().len() + 1
    } else {
        0
    };

    let mut out = String::new();
    let mut line = format!(
        "{:number_width$}{:<label_width$}",
        "",
        format!("{}{}", header.group_title, indicator(header.group_sort))
    );
    for (idx, measure) in header.measures.iter().enumerate() {
        let width = value_width(model, idx, measure);
        let _ = write!(line, "  {}", header_cell(measure, width));
    }
    push_line(&mut out, &line);

    for row in &model.rows {
        line = match row.row_number {
            Some(number) => format!("{number:<number_width$}"),
            None => String::new(),
        };
        let _ = write!(line, "{:<label_width$}", row.label);
        for (idx, (cell, measure)) in row.cells.iter().zip(&header.measures).enumerate() {
            let width = value_width(model, idx, measure);
            let _ = write!(line, "  {}", body_cell(cell, width));
        }
        push_line(&mut out, &line);
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn indicator(order: Option<SortOrder>) -> &'static str {
    match order {
        Some(SortOrder::Ascending) => " ▲",
        Some(SortOrder::Descending) => " ▼",
        None => "",
    }
}

fn value_width(model: &TableModel, idx: usize, measure: &MeasureHeader) -> usize {
    model
        .rows
        .iter()
        .filter_map(|row| row.cells.get(idx))
        .filter_map(|cell| cell.text.as_deref())
        .map(|text| text.chars().count())
        .chain(measure.value_title.as_ref().map(|title| title.chars().count() + 2))
        .max()
        .unwrap_or(0)
}

fn header_cell(measure: &MeasureHeader, width: usize) -> String {
    let mut parts = Vec::new();
    if let Some(title) = &measure.value_title {
        parts.push(format!("{:>width$}", format!("{title}{}", indicator(measure.sort))));
    }
    if let Some(title) = &measure.bar_title {
        parts.push(format!("{:^bar$}", title, bar = BAR_HALF_WIDTH * 2 + 1));
    }
    if let Some(title) = &measure.sparkline_title {
        parts.push(title.clone());
    }
    parts.join(" ")
}

fn body_cell(cell: &CellModel, width: usize) -> String {
    let mut parts = Vec::new();
    if let Some(text) = &cell.text {
        parts.push(format!("{text:>width$}"));
    }
    if let Some(bar) = cell.bar {
        parts.push(diverging_bar(bar));
    }
    if let Some(sparkline) = &cell.sparkline {
        parts.push(spark(&sparkline.values));
    }
    parts.join(" ")
}

/// `####|` for negative values and `|####` for positive ones, centred on the axis.
pub fn diverging_bar(bar: BarExtent) -> String {
    let cells = |pct: f64| ((pct / 100.0) * BAR_HALF_WIDTH as f64).round() as usize;
    let negative = cells(bar.negative).min(BAR_HALF_WIDTH);
    let positive = cells(bar.positive).min(BAR_HALF_WIDTH);
    format!(
        "{}{}|{}{}",
        " ".repeat(BAR_HALF_WIDTH - negative),
        "#".repeat(negative),
        "#".repeat(positive),
        " ".repeat(BAR_HALF_WIDTH - positive)
    )
}

/// One block character per value, scaled between the series minimum and maximum.
pub fn spark(values: &[f64]) -> String {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|&value| {
            if !value.is_finite() {
                return ' ';
            }
            if range <= 0.0 {
                return SPARK_BLOCKS[0];
            }
            let level = ((value - min) / range * (SPARK_BLOCKS.len() - 1) as f64).round() as usize;
            SPARK_BLOCKS[level.min(SPARK_BLOCKS.len() - 1)]
        })
        .collect()
}
