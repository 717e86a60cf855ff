//! Resolved values.
//!
//! This module defines the [`Value`] enum handed to callers by
//! [`Resolver::value`](crate::Resolver::value). Arrays and objects are
//! reference counted so that branches which did not change between two
//! fragments are *the same allocation* in both results; see
//! [`Value::same_ref`].

use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt;

use crate::map::Map;

/// A possibly partial JSON value.
///
/// Scalars are only ever complete, except strings, which may hold the prefix
/// typed so far when their shape is eager. Containers hold the children that
/// have surfaced so far.
///
/// # Examples
///
/// ```
/// use jsonresolve::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key", Value::String("value".into()));
/// let v = Value::object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// A JSON `null`.
    #[default]
    Null,
    /// A JSON boolean.
    Boolean(bool),
    /// A JSON number.
    Number(f64),
    /// A JSON string, or the prefix of one that is still being streamed.
    String(String),
    /// A JSON array.
    Array(Arc<Vec<Value>>),
    /// A JSON object, keys in declaration or arrival order.
    Object(Arc<Map>),
    /// A declared record field that has not surfaced yet.
    ///
    /// Only appears as the value of a record field; it is omitted when the
    /// value is rendered as JSON.
    Pending,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(Arc::new(v))
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(Arc::new(v))
    }
}

impl Value {
    /// Builds an array value from its elements.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(Arc::new(items.into_iter().collect()))
    }

    /// Builds an object value from a map.
    #[must_use]
    pub fn object(map: Map) -> Self {
        Self::Object(Arc::new(map))
    }

    /// Returns `true` if the value is [`Null`](Value::Null).
    ///
    /// ```
    /// use jsonresolve::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Boolean(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`](Value::Boolean).
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Number`](Value::Number).
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`](Value::String).
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`](Value::Array).
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`](Value::Object).
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Returns `true` if the value is [`Pending`](Value::Pending).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The boolean, if this is a [`Value::Boolean`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// The number, if this is a [`Value::Number`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        if let Self::Number(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Borrows the text, if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Borrows the elements, if this is a [`Value::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        if let Self::Array(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Borrows the entries, if this is a [`Value::Object`].
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        if let Self::Object(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Looks up `key` if this is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Reference identity for containers, equality for scalars.
    ///
    /// Two arrays or objects are the same reference when they share one
    /// allocation. Consumers use this to detect an unchanged branch without
    /// comparing its contents.
    ///
    /// ```
    /// use jsonresolve::Value;
    ///
    /// let a = Value::array([Value::Null]);
    /// let b = a.clone();
    /// assert!(a.same_ref(&b));
    /// assert!(!a.same_ref(&Value::array([Value::Null])));
    /// ```
    #[must_use]
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Array(_) | Self::Object(_), _) | (_, Self::Array(_) | Self::Object(_)) => false,
            (a, b) => a == b,
        }
    }
}

/// Escapes a string for inclusion in a JSON string literal.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_ascii_control() => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Renders the value as compact JSON. [`Value::Pending`] fields are skipped.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Pending => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) if !n.is_finite() => f.write_str("null"),
            Value::Number(n) if n.abs() >= 1e16 || (*n != 0.0 && n.abs() < 1e-6) => {
                write!(f, "{n:e}")
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map.iter().filter(|(_, v)| !v.is_pending()) {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(any(test, feature = "serde"))]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null | Value::Pending => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr.iter() {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let present = map.values().filter(|v| !v.is_pending()).count();
                let mut out = serializer.serialize_map(Some(present))?;
                for (k, v) in map.iter().filter(|(_, v)| !v.is_pending()) {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}
