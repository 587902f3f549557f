use approx::assert_relative_eq;
use chart_scene::core::{
    BandScale, CategoryKey, ContinuousScale, PixelRange, Scale, SeriesDomain, continuous_domain,
    union_categories, union_continuous,
};
use indexmap::IndexSet;
use proptest::prelude::*;
use serde_json::{Value, json};

#[test]
fn continuous_scale_maps_domain_onto_inverted_range() {
    let scale =
        ContinuousScale::new((0.0, 200.0), PixelRange::new(280.0, 20.0)).expect("valid scale");

    assert_relative_eq!(scale.convert(&json!(0)).expect("min"), 280.0);
    assert_relative_eq!(scale.convert(&json!(200)).expect("max"), 20.0);
    assert_relative_eq!(scale.convert(&json!(100)).expect("mid"), 150.0);
    assert_eq!(scale.convert(&json!("n/a")), None);
    assert_eq!(scale.convert(&Value::Null), None);
    assert_eq!(scale.bandwidth(), None);
}

#[test]
fn single_value_domain_is_widened_by_one() {
    let values = [json!(10)];
    assert_eq!(continuous_domain(&values), (9.0, 11.0));

    let mut scale = ContinuousScale::default();
    scale.set_domain(&values);
    scale.set_range(PixelRange::new(0.0, 100.0)).expect("range");
    assert_relative_eq!(scale.convert(&json!(10)).expect("value"), 50.0);
}

#[test]
fn non_numeric_column_falls_back_to_unit_domain() {
    let values = [json!("a"), Value::Null, json!(true)];
    assert_eq!(continuous_domain(&values), (0.0, 1.0));
}

#[test]
fn band_scale_centers_categories() {
    let mut scale = BandScale::default();
    scale.set_domain(&[json!("Q1"), json!("Q2"), json!("Q3")]);
    scale.set_range(PixelRange::new(20.0, 380.0)).expect("range");

    assert_relative_eq!(scale.bandwidth().expect("bandwidth"), 120.0);
    assert_relative_eq!(scale.band_start(&json!("Q2")).expect("start"), 140.0);
    assert_relative_eq!(scale.convert(&json!("Q2")).expect("center"), 200.0);
    assert_eq!(scale.convert(&json!("Q4")), None);
}

#[test]
fn band_scale_distinguishes_null_from_text() {
    let mut scale = BandScale::default();
    scale.set_domain(&[json!("null"), Value::Null]);
    assert_eq!(scale.domain().len(), 2);
    assert_eq!(scale.index_of(&CategoryKey::Null), Some(1));
}

#[test]
fn union_keeps_first_seen_category_order() {
    let first: IndexSet<CategoryKey> = ["b", "a"].into_iter().map(CategoryKey::from).collect();
    let second: IndexSet<CategoryKey> = ["c", "a"].into_iter().map(CategoryKey::from).collect();
    let union = union_categories([&first, &second]);
    let labels: Vec<String> = union.iter().map(ToString::to_string).collect();
    assert_eq!(labels, ["b", "a", "c"]);
}

#[test]
fn continuous_union_is_the_envelope() {
    let domains = [
        SeriesDomain::continuous((0.0, 10.0)),
        SeriesDomain::continuous((-5.0, 3.0)),
    ];
    assert_eq!(
        union_continuous(domains.iter().filter_map(SeriesDomain::as_continuous)),
        Some((-5.0, 10.0))
    );
    assert_eq!(union_continuous(std::iter::empty()), None);
}

proptest! {
    #[test]
    fn band_centers_are_evenly_spaced(
        count in 1usize..40,
        start in -1_000.0f64..1_000.0,
        width in 1.0f64..5_000.0
    ) {
        let values: Vec<Value> = (0..count).map(|index| json!(format!("c{index}"))).collect();
        let mut scale = BandScale::default();
        scale.set_domain(&values);
        scale.set_range(PixelRange::new(start, start + width)).expect("range");

        let bandwidth = scale.bandwidth().expect("bandwidth");
        prop_assert!((bandwidth - width / count as f64).abs() <= 1e-9);
        for pair in values.windows(2) {
            let left = scale.convert(&pair[0]).expect("left");
            let right = scale.convert(&pair[1]).expect("right");
            prop_assert!((right - left - bandwidth).abs() <= 1e-6);
        }
    }

    #[test]
    fn extent_endpoints_map_to_range_endpoints(
        values in prop::collection::vec(-1e6f64..1e6, 2..64),
        top in 0.0f64..100.0,
        height in 10.0f64..1_000.0
    ) {
        let column: Vec<Value> = values.iter().map(|value| json!(value)).collect();
        let (min, max) = continuous_domain(&column);
        prop_assert!(min < max);

        let bottom = top + height;
        let scale = ContinuousScale::new((min, max), PixelRange::new(bottom, top))
            .expect("valid scale");
        prop_assert!((scale.convert_number(min) - bottom).abs() <= 1e-6);
        prop_assert!((scale.convert_number(max) - top).abs() <= 1e-6);
        for value in &values {
            let pixel = scale.convert_number(*value);
            prop_assert!(pixel >= top - 1e-6 && pixel <= bottom + 1e-6);
        }
    }
}
