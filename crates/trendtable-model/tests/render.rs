use pretty_assertions::assert_eq;
use trendtable_model::render::{Sparkline, ALTERNATE_ROW_BACKGROUND, ROW_BACKGROUND};
use trendtable_model::{
    render_table, reshape_query, BarExtent, Condition, ConditionalFormatting, QueryResult, ReshapeOptions, SortOrder,
    SortTarget, TableEvent, TableSettings, TableView,
};

const QUERY: &str = r#"{
    "data": [
        [{"value": "East"}, {"value": "2024-01"}, {"value": 10}],
        [{"value": "West"}, {"value": "2024-01"}, {"value": -5}],
        [{"value": "East"}, {"value": "2024-02"}, {"value": 12}],
        [{"value": "North"}, {"value": "2024-01"}, {"value": 7}],
        [{"value": "West"}, {"value": "2024-02"}, {"value": -3}]
    ],
    "measureHeaders": [{"label": "Sales.Revenue"}],
    "rowHeaders": [{"label": "Region"}]
}"#;

fn view(settings: &TableSettings) -> TableView {
    let query = QueryResult::from_json(QUERY).expect("parse query");
    TableView::new(reshape_query(&query, settings, &ReshapeOptions::default()))
}

#[test]
fn renders_headers_and_rows() {
    let settings = TableSettings::default();
    let mut formatting = ConditionalFormatting::default();
    formatting.bind(
        0,
        "revenue",
        vec![Condition::new(">", 20, "green"), Condition::new("<", 0, "red")],
    );

    let model = render_table(&view(&settings), &settings, &formatting);

    assert_eq!(model.header.group_title, "Region");
    let measure = &model.header.measures[0];
    assert_eq!(measure.value_title.as_deref(), Some("Revenue Value"));
    assert_eq!(measure.bar_title.as_deref(), Some("Revenue Bar Chart"));
    assert_eq!(measure.sparkline_title.as_deref(), Some("Revenue Sparkline"));

    let labels: Vec<&str> = model.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["East", "West", "North"]);

    let east = &model.rows[0].cells[0];
    assert_eq!(east.value, 22.0);
    assert_eq!(east.text.as_deref(), Some("22.00"));
    assert_eq!(east.style.color, "green");
    assert_eq!(
        east.bar,
        Some(BarExtent {
            negative: 0.0,
            positive: 10.0 / 12.0 * 100.0,
        })
    );
    assert_eq!(
        east.sparkline,
        Some(Sparkline {
            title: "East Revenue".to_string(),
            values: vec![10.0, 12.0],
            dates: vec!["2024-01".to_string(), "2024-02".to_string()],
        })
    );

    let west = &model.rows[1].cells[0];
    assert_eq!(west.text.as_deref(), Some("-8.00"));
    assert_eq!(west.style.color, "red");
    assert_eq!(model.rows[2].cells[0].style.color, settings.cell_font_color);

    assert_eq!(model.rows[0].background, ROW_BACKGROUND);
    assert_eq!(model.rows[1].background, ALTERNATE_ROW_BACKGROUND);
    assert_eq!(model.rows[0].row_number, None);
}

#[test]
fn hidden_columns_are_omitted() {
    let settings = TableSettings {
        show_bar_charts: false,
        show_line_charts: false,
        show_row_numbers: true,
        alternating_row_colors: false,
        ..TableSettings::default()
    };
    let model = render_table(&view(&settings), &settings, &ConditionalFormatting::default());

    assert_eq!(model.header.measures[0].bar_title, None);
    assert_eq!(model.header.measures[0].sparkline_title, None);
    let row = &model.rows[1];
    assert_eq!(row.row_number, Some(2));
    assert_eq!(row.background, ROW_BACKGROUND);
    assert_eq!(row.cells[0].bar, None);
    assert_eq!(row.cells[0].sparkline, None);
}

#[test]
fn aggregation_and_locale_follow_settings() {
    let settings: TableSettings =
        TableSettings::from_json(r##"{"aggregationMethod": "max", "numberLocale": "de-DE", "measureFormats": ["#,##0.0"]}"##)
            .expect("parse settings");
    let model = render_table(&view(&settings), &settings, &ConditionalFormatting::default());
    assert_eq!(model.rows[0].cells[0].text.as_deref(), Some("12,0"));
}

#[test]
fn sort_indicator_follows_view() {
    let settings = TableSettings::default();
    let mut view = view(&settings);
    view.apply(TableEvent::ToggleSort(SortTarget::Measure(0)));

    let model = render_table(&view, &settings, &ConditionalFormatting::default());
    assert_eq!(model.header.measures[0].sort, Some(SortOrder::Descending));
    assert_eq!(model.header.group_sort, None);
    assert_eq!(model.rows[0].label, "East");
    assert_eq!(model.rows[2].label, "West");
}

#[test]
fn serializes_for_the_host() {
    let settings = TableSettings::default();
    let model = render_table(&view(&settings), &settings, &ConditionalFormatting::default());
    let json = serde_json::to_value(&model).expect("serialize model");
    assert_eq!(json["header"]["groupTitle"], "Region");
    assert_eq!(json["rows"][0]["cells"][0]["text"], "22.00");
}
