//! Turns a reader [`Node`] into a resolved [`Value`] under an optional shape.
//!
//! Without a shape every closed value surfaces as-is, containers surface while
//! still open, and open scalars are held back. With a shape, the shape
//! decides:
//!
//! - an open string surfaces its prefix only under an eager string leaf;
//! - records always carry exactly their declared fields, in declaration order,
//!   filled with defaults (or [`Value::Pending`]) until a value arrives;
//! - a union resolves with the first variant whose structure admits the node,
//!   or with the variant named by a `{"<index>": value}` envelope when
//!   [`ResolverOptions::union_envelope`] is set;
//! - a missing field of a nullable union holds `null`.
//!
//! A closed value that does not fit its shape is surfaced permissively so the
//! caller's validator still sees it; an open one is held back.

use alloc::string::ToString;

use crate::{
    map::Map,
    options::ResolverOptions,
    reader::{Node, NodeKind},
    shape::{LeafKind, Shape},
    value::Value,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Builder<'a> {
    shape: Option<&'a Shape>,
    primitive_wrapper: Option<&'a str>,
    union_envelope: bool,
}

impl<'a> Builder<'a> {
    pub fn new(shape: Option<&'a Shape>, options: &ResolverOptions) -> Self {
        Self {
            shape,
            primitive_wrapper: options.primitive_wrapper,
            union_envelope: options.union_envelope,
        }
    }

    /// Resolves the root. `root` is `None` until the first byte of a value
    /// has been read.
    pub fn build(&self, root: Option<&Node<'_>>) -> Option<Value> {
        let Some(shape) = self.shape else {
            return root.and_then(project);
        };
        let root = match (root, self.primitive_wrapper) {
            (Some(node), Some(field)) if !shape.is_record() => unwrap_primitive(node, field),
            (root, _) => root,
        };
        match root {
            Some(node) => self.resolve(node, shape),
            None => shape.default_value(),
        }
    }

    fn resolve(&self, node: &Node<'_>, shape: &Shape) -> Option<Value> {
        match shape {
            Shape::Leaf { kind, eager } => {
                if node.closed {
                    return project(node);
                }
                match &node.kind {
                    NodeKind::String(text) if *eager && *kind == LeafKind::String => {
                        Some(Value::String(text.to_string()))
                    }
                    _ => None,
                }
            }
            Shape::Sequence { item, .. } => match &node.kind {
                NodeKind::Array(items) => Some(Value::array(
                    items.iter().filter_map(|child| self.resolve(child, item)),
                )),
                _ => mismatch(node),
            },
            Shape::Record { fields, .. } => match &node.kind {
                NodeKind::Object(entries) => Some(Value::object(
                    fields
                        .iter()
                        .map(|field| {
                            let value = entries
                                .iter()
                                .rev()
                                .find(|e| *e.key == *field.name)
                                .and_then(|e| self.resolve(&e.value, &field.shape))
                                .or_else(|| field.shape.field_default())
                                .unwrap_or(Value::Pending);
                            (field.name.clone(), value)
                        })
                        .collect::<Map>(),
                )),
                _ => mismatch(node),
            },
            Shape::Union { variants } => {
                if let Some((variant, inner)) = self.envelope(variants, node) {
                    return self.resolve(inner, variant);
                }
                match variants.iter().find(|v| self.admits(v, node)) {
                    Some(variant) => self.resolve(node, variant),
                    None => mismatch(node),
                }
            }
        }
    }

    /// Picks the variant named by a `{"<index>": value}` envelope, when
    /// envelopes are enabled and the object holds exactly one such entry.
    fn envelope<'s, 'n, 'src>(
        &self,
        variants: &'s [Shape],
        node: &'n Node<'src>,
    ) -> Option<(&'s Shape, &'n Node<'src>)> {
        if !self.union_envelope {
            return None;
        }
        let NodeKind::Object(entries) = &node.kind else {
            return None;
        };
        let [entry] = entries.as_slice() else {
            return None;
        };
        let index = entry.key.parse::<usize>().ok()?;
        variants.get(index).map(|variant| (variant, &entry.value))
    }

    /// Whether the structure read so far fits `shape`.
    ///
    /// Open nodes are judged on what has been read: an open literal already
    /// knows which keyword it is, and an open number is an integer as long as
    /// no fraction or exponent has appeared.
    fn admits(&self, shape: &Shape, node: &Node<'_>) -> bool {
        match (shape, &node.kind) {
            (Shape::Leaf { kind, .. }, kind_read) => matches!(
                (kind, kind_read),
                (LeafKind::String, NodeKind::String(_))
                    | (LeafKind::Number, NodeKind::Number { .. })
                    | (LeafKind::Boolean, NodeKind::Boolean(_))
                    | (LeafKind::Null, NodeKind::Null)
            ) || matches!(
                (kind, kind_read),
                (LeafKind::Integer, NodeKind::Number { text, .. }) if !text.contains(['.', 'e', 'E'])
            ),
            (Shape::Sequence { item, .. }, NodeKind::Array(items)) => {
                items.iter().all(|child| self.admits(item, child))
            }
            (Shape::Record { fields, .. }, NodeKind::Object(entries)) => entries.iter().all(|e| {
                fields
                    .iter()
                    .find(|f| *f.name == *e.key)
                    .is_some_and(|f| self.admits(&f.shape, &e.value))
            }),
            (Shape::Union { variants }, _) => match self.envelope(variants, node) {
                Some((variant, inner)) => self.admits(variant, inner),
                None => variants.iter().any(|v| self.admits(v, node)),
            },
            _ => false,
        }
    }
}

/// Strips a `{"<field>": ..}` wrapper from the root. An open wrapper with no
/// entry yet counts as a value that has not started.
fn unwrap_primitive<'n, 'src>(node: &'n Node<'src>, field: &str) -> Option<&'n Node<'src>> {
    let NodeKind::Object(entries) = &node.kind else {
        return Some(node);
    };
    match entries.as_slice() {
        [entry] if entry.key == field => Some(&entry.value),
        [] if !node.closed => None,
        _ => Some(node),
    }
}

fn mismatch(node: &Node<'_>) -> Option<Value> {
    if node.closed { project(node) } else { None }
}

/// Shape-free resolution.
fn project(node: &Node<'_>) -> Option<Value> {
    match &node.kind {
        NodeKind::Array(items) => Some(Value::array(items.iter().filter_map(project))),
        NodeKind::Object(entries) => Some(Value::object(
            entries
                .iter()
                .filter_map(|e| project(&e.value).map(|v| (&*e.key, v)))
                .collect::<Map>(),
        )),
        _ if !node.closed => None,
        NodeKind::Null => Some(Value::Null),
        NodeKind::Boolean(b) => Some(Value::Boolean(*b)),
        NodeKind::Number { value, .. } => value.map(Value::Number),
        NodeKind::String(text) => Some(Value::String(text.to_string())),
    }
}
