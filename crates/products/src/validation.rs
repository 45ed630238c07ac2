//! Declarative request field rules.
//!
//! A route declares an ordered table of [`FieldRule`]s. [`validate`] runs every
//! rule against a transport-independent [`RequestInput`] and returns one
//! [`FieldError`] per failing rule, in declaration order. Rules are never
//! short-circuited and never deduplicated: two rules on the same field can
//! both report.
//!
//! Field values are judged by their text form, the way form-style validators
//! do: an absent field or `null` is the empty string, numbers and booleans are
//! rendered as text.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};

use shopfront_core::id::is_decimal_integer;

/// Where a field is read from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Path parameter (e.g. `:id`).
    Params,
    /// Top-level field of the JSON body.
    Body,
}

/// Predicate over a field value; `None` means the field is absent.
pub type Check = fn(Option<&Value>) -> bool;

/// One declarative check: `{field, location, predicate, message}`.
#[derive(Debug, Copy, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub location: Location,
    pub check: Check,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn param(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            location: Location::Params,
            check,
            message,
        }
    }

    pub const fn body(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            location: Location::Body,
            check,
            message,
        }
    }

    /// Run this rule; `Some` when it fails.
    pub fn evaluate(&self, input: &RequestInput) -> Option<FieldError> {
        let value = input.get(self.location, self.field);
        if (self.check)(value) {
            return None;
        }
        Some(FieldError {
            kind: ErrorKind::Field,
            value: value.cloned(),
            message: self.message.to_string(),
            field: self.field.to_string(),
            location: self.location,
        })
    }
}

/// Discriminator carried by every error entry on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Field,
}

/// A single failed rule, shaped for the `{errors: [...]}` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(rename = "path")]
    pub field: String,
    pub location: Location,
}

/// The parts of a request that rules can see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInput {
    params: Map<String, Value>,
    body: Map<String, Value>,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Attach a JSON body. Anything other than an object carries no fields.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    pub fn get(&self, location: Location, field: &str) -> Option<&Value> {
        match location {
            Location::Params => self.params.get(field),
            Location::Body => self.body.get(field),
        }
    }
}

/// Evaluate every rule in order and collect all failures.
pub fn validate(rules: &[FieldRule], input: &RequestInput) -> Vec<FieldError> {
    rules.iter().filter_map(|rule| rule.evaluate(input)).collect()
}

/// Text form of a value (absent and `null` are empty).
pub fn as_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Numeric coercion used by comparisons: numeric strings count, empty text
/// and `null` are zero, anything else is not a number.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0.0);
            }
            if !s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')) {
                return None;
            }
            s.parse::<f64>().ok()
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Boolean coercion accepting `true`/`false`/`1`/`0` in text form.
pub fn as_flag(value: Option<&Value>) -> Option<bool> {
    match as_text(value).as_ref() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Predicates usable in a [`FieldRule`].
pub mod checks {
    use serde_json::Value;

    use super::{as_flag, as_number, as_text, is_decimal_integer};

    pub fn is_integer(value: Option<&Value>) -> bool {
        is_decimal_integer(&as_text(value))
    }

    pub fn not_empty(value: Option<&Value>) -> bool {
        !as_text(value).is_empty()
    }

    /// `^[+-]?([0-9]*[.])?[0-9]+$`
    pub fn is_numeric(value: Option<&Value>) -> bool {
        let text = as_text(value);
        let text: &str = &text;
        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => ("", unsigned),
        };
        !fraction.is_empty()
            && whole.bytes().all(|b| b.is_ascii_digit())
            && fraction.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn is_positive(value: Option<&Value>) -> bool {
        as_number(value).is_some_and(|n| n > 0.0)
    }

    pub fn is_boolean(value: Option<&Value>) -> bool {
        as_flag(value).is_some()
    }
}

/// Rule tables for the product routes.
pub mod rules {
    use super::{FieldRule, checks};

    pub static PRODUCT_ID: &[FieldRule] = &[FieldRule::param("id", checks::is_integer, "Invalid id")];

    pub static CREATE_PRODUCT: &[FieldRule] = &[
        FieldRule::body("name", checks::not_empty, "Product name cannot be empty"),
        FieldRule::body("price", checks::is_numeric, "Invalid value"),
        FieldRule::body("price", checks::not_empty, "Product price cannot be empty"),
        FieldRule::body("price", checks::is_positive, "Invalid product price"),
    ];

    pub static UPDATE_PRODUCT: &[FieldRule] = &[
        FieldRule::param("id", checks::is_integer, "Invalid id"),
        FieldRule::body("name", checks::not_empty, "Product name cannot be empty"),
        FieldRule::body("price", checks::is_numeric, "Invalid value"),
        FieldRule::body("price", checks::not_empty, "Product price cannot be empty"),
        FieldRule::body("price", checks::is_positive, "Invalid product price"),
        FieldRule::body("availability", checks::is_boolean, "Invalid availability value"),
    ];
}
