use std::sync::Arc;

use chart_scene::api::{Chart, ChartConfig, SeriesId};
use chart_scene::core::{Row, Viewport};
use chart_scene::render::NullRenderer;
use chart_scene::series::{LineSeries, LineSeriesOptions, MarkerDatum, TooltipRendererParams};
use serde_json::{Value, json};

fn row(quarter: Value, revenue: Option<Value>) -> Row {
    let mut row = Row::new();
    row.insert("quarter".to_owned(), quarter);
    if let Some(revenue) = revenue {
        row.insert("revenue".to_owned(), revenue);
    }
    row
}

fn series(data: Vec<Row>) -> LineSeries {
    let mut series = LineSeries::from_options(
        LineSeriesOptions::default()
            .with_fields("quarter", "revenue")
            .with_title("Sales"),
    );
    series.set_data(data);
    series
}

fn datum(row_index: usize, series: &LineSeries) -> MarkerDatum {
    MarkerDatum {
        row_index,
        x: 0.0,
        y: 0.0,
        fill: series.fill(),
        stroke: series.stroke(),
        stroke_width: 1.0,
        size: 8.0,
    }
}

fn chart_with(series: LineSeries) -> (Chart<NullRenderer>, SeriesId) {
    let mut chart = Chart::new(
        NullRenderer::default(),
        ChartConfig::new(Viewport::new(400, 300)),
    )
    .expect("chart init");
    let id = chart.add_series(series).expect("add");
    chart.run_pass().expect("pass");
    (chart, id)
}

/// Tooltip for `row_index` once `series` has been drawn by a chart pass.
fn drawn_tooltip(series: LineSeries, row_index: usize) -> String {
    let (chart, id) = chart_with(series);
    let series = chart.series(id).expect("series");
    series.tooltip_html(&datum(row_index, series))
}

#[test]
fn default_tooltip_formats_numbers_to_two_decimals() {
    let series = series(vec![row(json!("Q1"), Some(json!(12.345)))]);
    let expected = format!(
        "<div class=\"title\" style=\"color: white; background-color: {}\">Sales</div>\
         <div class=\"content\">Q1: 12.35</div>",
        series.fill().to_hex_string()
    );
    assert_eq!(drawn_tooltip(series, 0), expected);
}

#[test]
fn null_and_missing_values_are_spelled_out() {
    let (chart, id) = chart_with(series(vec![
        row(json!("Q1"), Some(Value::Null)),
        row(json!("Q2"), None),
    ]));
    let series = chart.series(id).expect("series");
    assert!(
        series
            .tooltip_html(&datum(0, series))
            .ends_with("<div class=\"content\">Q1: null</div>")
    );
    assert!(
        series
            .tooltip_html(&datum(1, series))
            .ends_with("<div class=\"content\">Q2: undefined</div>")
    );
}

#[test]
fn unbound_fields_or_disabled_tooltips_yield_empty_markup() {
    let mut unbound = LineSeries::new();
    unbound.set_data(vec![row(json!("Q1"), Some(json!(1)))]);
    assert_eq!(drawn_tooltip(unbound, 0), "");

    let mut disabled = series(vec![row(json!("Q1"), Some(json!(1)))]);
    disabled.set_tooltip_enabled(false);
    assert_eq!(drawn_tooltip(disabled, 0), "");
}

#[test]
fn rows_are_not_readable_before_they_are_drawn() {
    let series = series(vec![row(json!("Q1"), Some(json!(1)))]);
    assert_eq!(series.tooltip_html(&datum(0, &series)), "");
    assert_eq!(drawn_tooltip(series, 5), "");
}

#[test]
fn tooltip_reads_the_row_a_marker_was_drawn_from() {
    let (mut chart, id) = chart_with(series(vec![
        row(json!("Q1"), Some(json!(1))),
        row(json!("Q2"), Some(json!(2))),
    ]));
    let drawn = chart.series(id).expect("series").marker_data()[0];

    chart.series_mut(id).expect("series").set_data(vec![
        row(json!("Q1"), Some(json!(99))),
        row(json!("Q2"), Some(json!(2))),
    ]);
    let stale = chart.series(id).expect("series").tooltip_html(&drawn);
    assert!(stale.ends_with("<div class=\"content\">Q1: 1.00</div>"));

    chart.run_pass().expect("pass");
    let series = chart.series(id).expect("series");
    let redrawn = series.marker_data()[0];
    assert!(
        series
            .tooltip_html(&redrawn)
            .ends_with("<div class=\"content\">Q1: 99.00</div>")
    );
}

#[test]
fn custom_renderer_receives_keys_and_names() {
    let mut series = series(vec![row(json!("Q1"), Some(json!(7)))]);
    series.set_y_field_name("Revenue");
    assert_eq!(series.y_field_name(), "Revenue");
    series.set_tooltip_renderer(Some(Arc::new(|params: &TooltipRendererParams<'_>| {
        format!(
            "{} / {}={}",
            params.title.unwrap_or_default(),
            params.y_name,
            params.datum[params.y_key]
        )
    })));

    assert_eq!(drawn_tooltip(series, 0), "Sales / Revenue=7");
}

#[test]
fn pointer_over_marker_highlights_and_returns_tooltip() {
    let (mut chart, id) = chart_with(series(vec![
        row(json!("Q1"), Some(json!(1))),
        row(json!("Q2"), Some(json!(3))),
    ]));
    // Q1 sits at (110, 280) with two 180px bands
    let hit = chart
        .pointer_move(111.0, 279.0)
        .expect("pointer move")
        .expect("marker hit");
    assert_eq!(hit.series_id, id);
    assert_eq!(hit.row_index, 0);
    assert!(
        hit.tooltip_html
            .as_deref()
            .is_some_and(|html| html.contains("Q1: 1.00"))
    );
    assert_eq!(chart.highlighted().map(|h| h.node), Some(hit.node));
    assert!(chart.series(id).expect("series").is_render_dirty());

    assert!(chart.pointer_move(5.0, 5.0).expect("pointer move").is_none());
    assert_eq!(chart.highlighted(), None);
}

#[test]
fn pointer_leave_clears_highlight() {
    let (mut chart, _) = chart_with(series(vec![row(json!("Q1"), Some(json!(1)))]));
    // single band: (200, 150)
    chart
        .pointer_move(200.0, 150.0)
        .expect("pointer move")
        .expect("marker hit");
    chart.pointer_leave();
    assert_eq!(chart.highlighted(), None);
    assert!(!chart.pointer().inside);
}

#[test]
fn disabled_tooltip_still_highlights() {
    let mut disabled = series(vec![row(json!("Q1"), Some(json!(1)))]);
    disabled.set_tooltip_enabled(false);
    let (mut chart, _) = chart_with(disabled);

    let hit = chart
        .pointer_move(200.0, 150.0)
        .expect("pointer move")
        .expect("marker hit");
    assert_eq!(hit.tooltip_html, None);
    assert!(chart.highlighted().is_some());
}
