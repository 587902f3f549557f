use chart_scene::api::{AxisKind, ChartConfig};
use chart_scene::core::{Padding, Viewport};
use chart_scene::render::Color;
use chart_scene::scene::MarkerShape;
use chart_scene::series::LineSeriesOptions;

#[test]
fn missing_fields_take_defaults() {
    let config = ChartConfig::from_json_str(r#"{ "viewport": { "width": 640, "height": 480 } }"#)
        .expect("config");
    assert_eq!(config, ChartConfig::new(Viewport::new(640, 480)));
    assert_eq!(config.padding, Padding::uniform(20.0));
    assert_eq!(config.x_axis, Some(AxisKind::Category));
    assert_eq!(config.y_axis, Some(AxisKind::continuous()));
}

#[test]
fn axes_round_trip_through_json() {
    let config = ChartConfig::new(Viewport::new(640, 480))
        .with_x_axis(None)
        .with_y_axis(Some(AxisKind::Continuous { clamp: true }))
        .with_padding(Padding::uniform(8.0));
    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"clamp\": true"));
    assert_eq!(ChartConfig::from_json_str(&json).expect("parse"), config);
}

#[test]
fn malformed_or_invalid_config_is_rejected() {
    assert!(ChartConfig::from_json_str("{").is_err());
    assert!(ChartConfig::from_json_str(r#"{ "viewport": { "width": 0, "height": 10 } }"#).is_err());
    assert!(
        ChartConfig::from_json_str(
            r#"{ "viewport": { "width": 10, "height": 10 }, "y_axis": { "type": "category" } }"#
        )
        .is_err()
    );
}

#[test]
fn series_options_parse_colors_and_defaults() {
    let options: LineSeriesOptions = serde_json::from_str(
        r##"{
            "x_field": "quarter",
            "y_field": "revenue",
            "fill": "#ff0000",
            "marker": { "shape": "triangle", "size": 12.0 }
        }"##,
    )
    .expect("options");

    assert_eq!(options.fill, Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(options.marker.shape, MarkerShape::Triangle);
    assert_eq!(options.marker.size, 12.0);
    assert!(options.marker.enabled);
    assert!(options.visible);
    assert!(options.tooltip_enabled);
    assert_eq!(options.stroke_width, 3.0);
    assert!(options.validate().is_ok());

    let json = serde_json::to_string(&options).expect("serialize");
    let back: LineSeriesOptions = serde_json::from_str(&json).expect("parse");
    assert_eq!(back, options);
}

#[test]
fn bad_colors_fail_to_parse() {
    let result: Result<LineSeriesOptions, _> = serde_json::from_str(r##"{ "fill": "#zzzzzz" }"##);
    assert!(result.is_err());
}
