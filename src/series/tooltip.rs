use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;

use crate::core::{Row, as_finite_number, display_value};
use crate::render::Color;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Everything a custom tooltip renderer gets to see.
#[derive(Debug, Clone, Serialize)]
pub struct TooltipRendererParams<'a> {
    pub datum: &'a Row,
    pub x_key: &'a str,
    pub x_name: &'a str,
    pub y_key: &'a str,
    pub y_name: &'a str,
    pub title: Option<&'a str>,
    pub color: Color,
}

/// Caller-supplied tooltip body. Returns an HTML fragment.
pub type TooltipRendererFn =
    Arc<dyn Fn(&TooltipRendererParams<'_>) -> String + Send + Sync + 'static>;

/// Formats `value` with `digits` fraction digits when `|value| >= 1`, and
/// with `digits` significant digits when it is smaller.
///
/// Rounding is half away from zero on the shortest decimal representation,
/// so `12.345` becomes `"12.35"`.
#[must_use]
pub fn to_fixed(value: f64, digits: u32) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }

    let magnitude = value.abs();
    let scale = if magnitude >= 1.0 || magnitude == 0.0 {
        digits
    } else {
        let leading_zeros = (-magnitude.log10().floor()) as u32 - 1;
        leading_zeros + digits
    };
    round_half_away_from_zero(value, scale)
}

fn round_half_away_from_zero(value: f64, scale: u32) -> String {
    if scale <= MAX_DECIMAL_SCALE {
        if let Ok(decimal) = Decimal::from_str(&value.to_string()) {
            let mut rounded =
                decimal.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(scale);
            return rounded.to_string();
        }
    }
    format!("{value:.prec$}", prec = scale as usize)
}

/// Tooltip text for a single field value: finite numbers through
/// [`to_fixed`], everything else verbatim.
#[must_use]
pub fn format_tooltip_value(value: Option<&Value>) -> String {
    match value.and_then(as_finite_number) {
        Some(number) => to_fixed(number, 2),
        None => display_value(value),
    }
}

/// Built-in tooltip: a colored title bar over an `x: y` line.
#[must_use]
pub fn default_tooltip_html(
    title: Option<&str>,
    color: Color,
    x: Option<&Value>,
    y: Option<&Value>,
) -> String {
    let content = format!(
        "{}: {}",
        escape_html(&format_tooltip_value(x)),
        escape_html(&format_tooltip_value(y))
    );
    match title {
        Some(title) => format!(
            "<div class=\"title\" style=\"color: white; background-color: {}\">{}</div>\
             <div class=\"content\">{content}</div>",
            color.to_hex_string(),
            escape_html(title),
        ),
        None => format!("<div class=\"content\">{content}</div>"),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
