//! Flattening of arbitrary context payloads into string-only breadcrumb data.

use crate::constants::{CONTEXT_SCALAR_KEY, INVALID_CONTEXT_VALUE, JSON_INDENT};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Breadcrumb-ready context: every value is already a string.
pub type ContextData = BTreeMap<String, String>;

/// Normalize a context payload.
///
/// Scalars land under the single `data` key, collections keep their keys (or
/// array indices) with each value rendered as text. Empty or falsy payloads
/// produce an empty map. Never fails.
pub fn prepare_context_data(data: Option<&Value>) -> ContextData {
    let mut context = ContextData::new();

    let Some(data) = data.filter(|value| is_truthy(value)) else {
        return context;
    };

    match data {
        Value::String(s) => {
            context.insert(CONTEXT_SCALAR_KEY.to_string(), s.clone());
        }
        Value::Number(n) => {
            context.insert(CONTEXT_SCALAR_KEY.to_string(), number_to_string(n));
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                context.insert(index.to_string(), prepare_context_value(value));
            }
        }
        Value::Object(entries) => {
            for (key, value) in entries {
                context.insert(key.clone(), prepare_context_value(value));
            }
        }
        // `true` carries no entries to flatten
        Value::Bool(_) | Value::Null => {}
    }

    context
}

fn prepare_context_value(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => to_indented_json(value),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        Value::Bool(_) | Value::Null => INVALID_CONTEXT_VALUE.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Integral floats print without a fractional part, so `3.0` reads as `3`.
fn number_to_string(n: &Number) -> String {
    without_integral_fraction(n).to_string()
}

fn without_integral_fraction(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

fn integral_floats_as_integers(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(without_integral_fraction(n)),
        Value::Array(items) => Value::Array(items.iter().map(integral_floats_as_integers).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), integral_floats_as_integers(value)))
                .collect(),
        ),
        Value::String(_) | Value::Bool(_) | Value::Null => value.clone(),
    }
}

/// Render a value as pretty JSON with a two-space indent, keys in insertion
/// order and integral floats without a fraction.
pub(crate) fn to_indented_json(value: &Value) -> String {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));

    match integral_floats_as_integers(value).serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => INVALID_CONTEXT_VALUE.to_string(),
    }
}
