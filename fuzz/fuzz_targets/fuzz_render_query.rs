#![no_main]

use libfuzzer_sys::fuzz_target;
use trendtable_model::{
    render_table, reshape_query, ConditionalFormatting, QueryResult, ReshapeOptions, SortDirection, SortTarget,
    TableEvent, TableSettings, TableView,
};

const MAX_INPUT_BYTES: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > MAX_INPUT_BYTES {
        return;
    }

    // Arbitrary bytes are mostly invalid JSON; the interesting inputs are the ones that parse.
    let Ok(json) = std::str::from_utf8(&data[1..]) else {
        return;
    };
    let Ok(query) = QueryResult::from_json(json) else {
        return;
    };

    let selector = data[0];
    let options = ReshapeOptions {
        date_column: if selector & 0b1 == 0 { Some(1) } else { None },
        max_series_len: 64,
        ..ReshapeOptions::default()
    };
    let settings = TableSettings::default();
    let table = reshape_query(&query, &settings, &options);

    for entity in &table.entities {
        for series in &entity.series {
            assert_eq!(series.len(), entity.dates.len());
        }
    }

    let mut view = TableView::new(table);
    let target = if selector & 0b10 == 0 {
        SortTarget::Label
    } else {
        SortTarget::Measure(usize::from(selector >> 4))
    };
    view.apply(TableEvent::Sort {
        target,
        direction: SortDirection::Descending,
    });
    let _ = render_table(&view, &settings, &ConditionalFormatting::default());
    view.apply(TableEvent::Reset);
});
