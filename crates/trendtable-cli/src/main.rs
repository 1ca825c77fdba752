use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use trendtable_model::{
    render_table, reshape_query, ConditionalFormatting, QueryResult, ReshapeOptions, SortDirection, SortTarget,
    TableEvent, TableSettings, TableView,
};

mod text;

#[derive(Parser, Debug)]
#[command(name = "trendtable")]
#[command(about = "Render a BI query result as a trend table (values, diverging bars, sparklines).")]
struct Args {
    /// Query result JSON (`data`, `measureHeaders`, `colHeaders`, `rowHeaders`).
    #[arg(long)]
    query: PathBuf,

    /// Table settings JSON. Omitted keys take their defaults.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Conditional-formatting JSON (`bindings` and `settings`).
    #[arg(long)]
    formatting: Option<PathBuf>,

    /// Column to sort by: `label` or a 0-based measure index.
    #[arg(long, value_parser = parse_sort_target)]
    sort: Option<SortTarget>,

    #[arg(long, value_enum, default_value_t = Direction::Desc)]
    direction: Direction,

    /// Query rows have no date/period cell after the dimension.
    #[arg(long = "no-date-column")]
    no_date_column: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for SortDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => SortDirection::Ascending,
            Direction::Desc => SortDirection::Descending,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_sort_target(raw: &str) -> Result<SortTarget, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("label") {
        return Ok(SortTarget::Label);
    }
    raw.parse::<usize>()
        .map(SortTarget::Measure)
        .map_err(|_| format!("expected `label` or a measure index, got {raw:?}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let query = QueryResult::from_json(&read(&args.query)?)
        .with_context(|| format!("parse query result {}", args.query.display()))?;
    let settings = match &args.settings {
        Some(path) => TableSettings::from_json(&read(path)?)
            .with_context(|| format!("parse settings {}", path.display()))?,
        None => TableSettings::default(),
    };
    let formatting = match &args.formatting {
        Some(path) => ConditionalFormatting::from_json(&read(path)?)
            .with_context(|| format!("parse conditional formatting {}", path.display()))?,
        None => ConditionalFormatting::default(),
    };

    let options = ReshapeOptions {
        date_column: if args.no_date_column { None } else { Some(1) },
        ..ReshapeOptions::default()
    };
    let table = reshape_query(&query, &settings, &options);
    log::debug!(
        "{} rows -> {} entities x {} measures",
        query.data.len(),
        table.entities.len(),
        table.measure_columns.len()
    );

    let mut view = TableView::new(table);
    if let Some(target) = args.sort {
        if let SortTarget::Measure(measure) = target {
            let count = view.measure_columns().len();
            if measure >= count {
                bail!("cannot sort by measure {measure}: the query has {count} measures");
            }
        }
        view.apply(TableEvent::Sort {
            target,
            direction: args.direction.into(),
        });
    }

    let model = render_table(&view, &settings, &formatting);
    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&model).context("serialize table model")?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{}", text::render_text(&model)),
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
