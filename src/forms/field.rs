//! Shared field capability and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use super::proxy_field::ProxyField;
use super::resolve::Resolve;
use super::value_field::ValueField;

/// Shared handle to a field living in a form scope
pub type FieldHandle = Rc<dyn Field>;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    /// Convert to a JSON value. Non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }

    /// Get the numeric value, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

/// How a value field presents its stored text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Number,
}

impl Format {
    /// Parse a format name. Anything other than `"number"` is text.
    pub fn from_name(name: &str) -> Self {
        match name {
            "number" => Format::Number,
            _ => Format::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Number => "number",
        }
    }
}

/// Coerce text to a number.
///
/// Surrounding whitespace is ignored and blank text is `0`. Decimal and
/// exponent notation, unsigned `0x`/`0o`/`0b` integer literals and
/// `Infinity` are accepted; anything else is NaN.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if let Some(n) = parse_prefixed_integer(trimmed) {
        return n;
    }
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // str::parse also takes "inf" and "nan" spellings
        _ if trimmed
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') =>
        {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// `0x1A`, `0o17`, `0b101` (prefix in either case). `None` without a prefix,
/// NaN for a prefix followed by no or invalid digits.
fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let n = digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN);
    Some(n)
}

/// Configuration object handed to a field on construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Initial value
    pub value: Option<String>,
    /// Placeholder text shown while the field is empty
    pub placeholder: Option<String>,
    /// Completions offered by the input
    pub autocomplete: Option<Vec<String>>,
    /// `"text"` or `"number"`
    pub format: Option<String>,
    /// Reference path of the proxied field
    pub target: Option<String>,
}

/// Field variants known to form definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[serde(alias = "textfield")]
    Text,
    #[serde(alias = "linkfield")]
    Link,
}

impl FieldKind {
    /// Construct a field of this kind
    pub fn build(self, id: &str, config: &FieldConfig) -> FieldHandle {
        match self {
            FieldKind::Text => Rc::new(ValueField::new(id, config)),
            FieldKind::Link => Rc::new(ProxyField::new(id, config)),
        }
    }
}

/// Form field capability shared by all variants.
///
/// Every operation takes the scope used to resolve references to other
/// fields. Fields that hold their own value ignore it.
pub trait Field: fmt::Debug {
    fn id(&self) -> &str;

    fn kind(&self) -> FieldKind;

    /// Current value, or `None` when the field has nothing to report
    fn value(&self, scope: &dyn Resolve) -> Option<Value>;

    fn set_value(&self, value: Value, scope: &dyn Resolve);

    fn is_empty(&self, scope: &dyn Resolve) -> bool {
        match self.value(scope) {
            None => true,
            Some(Value::Text(s)) => s.is_empty(),
            Some(Value::Number(_)) => false,
        }
    }

    fn as_value_field(&self) -> Option<&ValueField> {
        None
    }

    fn as_proxy_field(&self) -> Option<&ProxyField> {
        None
    }
}
