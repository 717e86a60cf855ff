//! Shape descriptors.
//!
//! A [`Shape`] describes the document a model was asked to produce. It
//! decides which in-progress values are surfaced before they are closed and
//! which record fields exist before any of them arrive. A shape is plain
//! immutable data; build it once and hand it to a
//! [`Resolver`](crate::Resolver).
//!
//! ```
//! use jsonresolve::Shape;
//!
//! let shape = Shape::record([
//!     ("title", Shape::string().eager()),
//!     ("tags", Shape::sequence(Shape::string())),
//!     ("score", Shape::number()),
//! ]);
//! assert_eq!(shape.fields().len(), 3);
//! ```

use alloc::{boxed::Box, string::String, sync::Arc, vec::Vec};

use crate::{map::Map, value::Value};

/// Kinds of scalar leaves.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number without a fractional part.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
}

/// A named field of a [`Shape::Record`].
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// The key of the field in the JSON object.
    pub name: Arc<str>,
    /// The expected shape of the field's value.
    pub shape: Shape,
}

/// The expected shape of a document or of one of its parts.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "lowercase")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A scalar.
    Leaf {
        /// Which scalar.
        kind: LeafKind,
        /// Surface the value before it is closed. Only strings show partial
        /// text; eager numbers and booleans surface their zero value until the
        /// real one closes.
        #[cfg_attr(any(test, feature = "serde"), serde(default))]
        eager: bool,
    },
    /// An array whose elements all have the same shape.
    Sequence {
        /// Shape of every element.
        item: Box<Shape>,
        /// Containers always surface; kept for defaults and round-tripping.
        #[cfg_attr(any(test, feature = "serde"), serde(default))]
        eager: bool,
    },
    /// An object with declared fields, in declaration order.
    Record {
        /// The declared fields.
        fields: Vec<Field>,
        /// Containers always surface; kept for defaults and round-tripping.
        #[cfg_attr(any(test, feature = "serde"), serde(default))]
        eager: bool,
    },
    /// The first variant that fits the value wins.
    Union {
        /// Candidate shapes, in order of preference.
        variants: Vec<Shape>,
    },
}

impl Shape {
    /// A string leaf.
    #[must_use]
    pub fn string() -> Self {
        Self::leaf(LeafKind::String)
    }

    /// A number leaf.
    #[must_use]
    pub fn number() -> Self {
        Self::leaf(LeafKind::Number)
    }

    /// An integer leaf.
    #[must_use]
    pub fn integer() -> Self {
        Self::leaf(LeafKind::Integer)
    }

    /// A boolean leaf.
    #[must_use]
    pub fn boolean() -> Self {
        Self::leaf(LeafKind::Boolean)
    }

    /// A `null` leaf.
    #[must_use]
    pub fn null() -> Self {
        Self::leaf(LeafKind::Null)
    }

    /// A leaf of the given kind.
    #[must_use]
    pub fn leaf(kind: LeafKind) -> Self {
        Self::Leaf { kind, eager: false }
    }

    /// An array of `item`.
    #[must_use]
    pub fn sequence(item: Shape) -> Self {
        Self::Sequence {
            item: Box::new(item),
            eager: false,
        }
    }

    /// An object with the given fields. A repeated name replaces the earlier
    /// declaration in place.
    #[must_use]
    pub fn record<K: Into<Arc<str>>>(fields: impl IntoIterator<Item = (K, Shape)>) -> Self {
        let mut declared: Vec<Field> = Vec::new();
        for (name, shape) in fields {
            let name = name.into();
            match declared.iter_mut().find(|f| f.name == name) {
                Some(existing) => existing.shape = shape,
                None => declared.push(Field { name, shape }),
            }
        }
        Self::Record {
            fields: declared,
            eager: false,
        }
    }

    /// Any of `variants`, tried in order.
    #[must_use]
    pub fn union(variants: impl IntoIterator<Item = Shape>) -> Self {
        Self::Union {
            variants: variants.into_iter().collect(),
        }
    }

    /// Marks this shape eager. On a union, every variant is marked.
    #[must_use]
    pub fn eager(self) -> Self {
        match self {
            Self::Leaf { kind, .. } => Self::Leaf { kind, eager: true },
            Self::Sequence { item, .. } => Self::Sequence { item, eager: true },
            Self::Record { fields, .. } => Self::Record {
                fields,
                eager: true,
            },
            Self::Union { variants } => Self::Union {
                variants: variants.into_iter().map(Shape::eager).collect(),
            },
        }
    }

    /// Whether the shape is eager. A union is eager when any variant is.
    #[must_use]
    pub fn is_eager(&self) -> bool {
        match self {
            Self::Leaf { eager, .. } | Self::Sequence { eager, .. } | Self::Record { eager, .. } => {
                *eager
            }
            Self::Union { variants } => variants.iter().any(Shape::is_eager),
        }
    }

    /// Returns `true` for [`Shape::Record`].
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// The declared fields of a record; empty for other shapes.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match self {
            Self::Record { fields, .. } => fields,
            _ => &[],
        }
    }

    /// The value surfaced for this shape before any of its input arrived.
    ///
    /// Containers default to empty containers (records with their own
    /// fields materialized), eager scalars to their zero value, and anything
    /// else to `None`.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Self::Leaf { eager: false, .. } => None,
            Self::Leaf { kind, eager: true } => Some(match kind {
                LeafKind::String => Value::String(String::new()),
                LeafKind::Number | LeafKind::Integer => Value::Number(0.0),
                LeafKind::Boolean => Value::Boolean(false),
                LeafKind::Null => Value::Null,
            }),
            Self::Sequence { .. } => Some(Value::array([])),
            Self::Record { fields, .. } => Some(Value::object(
                fields
                    .iter()
                    .map(|f| {
                        let v = f.shape.field_default().unwrap_or(Value::Pending);
                        (f.name.clone(), v)
                    })
                    .collect::<Map>(),
            )),
            Self::Union { variants } => variants.iter().find_map(Shape::default_value),
        }
    }

    /// Whether `null` is among the values this shape accepts.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Leaf { kind, .. } => *kind == LeafKind::Null,
            Self::Union { variants } => variants.iter().any(Shape::is_nullable),
            Self::Sequence { .. } | Self::Record { .. } => false,
        }
    }

    /// The value a record field of this shape holds while it is missing.
    ///
    /// Same as [`Shape::default_value`], except that a nullable union with no
    /// other default holds `null`.
    #[must_use]
    pub fn field_default(&self) -> Option<Value> {
        match self {
            Self::Union { .. } if self.is_nullable() => {
                Some(self.default_value().unwrap_or(Value::Null))
            }
            _ => self.default_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn record_defaults_materialize_every_field() {
        let shape = Shape::record([
            ("text", Shape::string().eager()),
            ("items", Shape::sequence(Shape::string())),
            ("count", Shape::number()),
            ("meta", Shape::record([("flag", Shape::boolean().eager())])),
        ]);
        let v = shape.default_value().unwrap();
        let map = v.as_object().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["text", "items", "count", "meta"]);
        assert!(map.get("count").unwrap().is_pending());
        assert_eq!(v.to_string(), r#"{"text":"","items":[],"meta":{"flag":false}}"#);
    }

    #[test]
    fn eager_on_union_marks_variants() {
        let shape = Shape::union([Shape::string(), Shape::number()]).eager();
        assert!(shape.is_eager());
        assert_eq!(
            shape.default_value(),
            Some(Value::String(String::new()))
        );
    }

    #[test]
    fn missing_nullable_union_field_is_null() {
        let nullable = Shape::union([Shape::string(), Shape::null()]);
        assert!(nullable.is_nullable());
        assert_eq!(nullable.default_value(), None);
        assert_eq!(nullable.field_default(), Some(Value::Null));
        assert_eq!(Shape::null().field_default(), None);
        assert_eq!(
            Shape::union([Shape::string().eager(), Shape::null()]).field_default(),
            Some(Value::String(String::new()))
        );

        let shape = Shape::record([("reason", nullable), ("count", Shape::number())]);
        assert_eq!(shape.default_value().unwrap().to_string(), r#"{"reason":null}"#);
    }

    #[test]
    fn repeated_field_names_replace_in_place() {
        let shape = Shape::record([("a", Shape::string()), ("b", Shape::null()), ("a", Shape::number())]);
        let names: Vec<_> = shape.fields().iter().map(|f| &*f.name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(shape.fields()[0].shape, Shape::number());
    }

    #[test]
    fn deserializes_from_tagged_json() {
        let shape: Shape = serde_json::from_str(
            r#"{"type":"record","fields":[{"name":"a","shape":{"type":"sequence","item":{"type":"leaf","kind":"string","eager":true}}}]}"#,
        )
        .unwrap();
        assert_eq!(
            shape,
            Shape::record([("a", Shape::sequence(Shape::string().eager()))])
        );
    }
}
