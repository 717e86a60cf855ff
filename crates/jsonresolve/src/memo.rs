//! Structural memoization of resolved values.
//!
//! Every fragment produces a freshly built value tree. [`reconcile`] walks it
//! bottom-up against the previous tree and substitutes the previous `Arc` for
//! every container whose content did not change, so unchanged branches keep
//! their reference and every changed node gets a new one along with all of
//! its ancestors.

use alloc::{sync::Arc, vec::Vec};

use crate::{map::Map, value::Value};

/// Reconciles `next` against `prev`.
///
/// Array children are matched by index and object children by key. A
/// container reuses its previous allocation when it has the same length and
/// key order and every child reconciled to the same reference.
pub(crate) fn reconcile(prev: Option<&Value>, next: Value) -> Value {
    match (prev, next) {
        (Some(Value::Array(old)), Value::Array(new)) => {
            let mut unchanged = old.len() == new.len();
            let items: Vec<Value> = Arc::unwrap_or_clone(new)
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    let prev_item = old.get(i);
                    let item = reconcile(prev_item, item);
                    unchanged &= prev_item.is_some_and(|p| p.same_ref(&item));
                    item
                })
                .collect();
            if unchanged {
                Value::Array(Arc::clone(old))
            } else {
                Value::Array(Arc::new(items))
            }
        }
        (Some(Value::Object(old)), Value::Object(new)) => {
            let mut unchanged = old.len() == new.len();
            let mut map = Map::with_capacity(new.len());
            for (i, (key, value)) in Arc::unwrap_or_clone(new).into_iter().enumerate() {
                let prev_value = old.get(&key);
                let value = reconcile(prev_value, value);
                unchanged &= old.get_index_of(&key) == Some(i)
                    && prev_value.is_some_and(|p| p.same_ref(&value));
                map.insert(key, value);
            }
            if unchanged {
                Value::Object(Arc::clone(old))
            } else {
                Value::Object(Arc::new(map))
            }
        }
        (_, next) => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::object(entries.into_iter().collect())
    }

    #[test]
    fn unchanged_tree_keeps_root_reference() {
        let prev = object([("a", Value::array([Value::from("x")]))]);
        let next = reconcile(Some(&prev), prev.clone());
        assert!(next.same_ref(&prev));

        let rebuilt = object([("a", Value::array([Value::from("x")]))]);
        let next = reconcile(Some(&prev), rebuilt);
        assert!(next.same_ref(&prev));
    }

    #[test]
    fn changed_leaf_replaces_ancestors_only() {
        let prev = object([
            ("a", Value::array([Value::from("x")])),
            ("b", Value::array([])),
        ]);
        let next = object([
            ("a", Value::array([Value::from("x")])),
            ("b", Value::array([Value::from("y")])),
        ]);
        let next = reconcile(Some(&prev), next);
        assert!(!next.same_ref(&prev));
        assert!(next.get("a").unwrap().same_ref(prev.get("a").unwrap()));
        assert!(!next.get("b").unwrap().same_ref(prev.get("b").unwrap()));
    }

    #[test]
    fn appended_element_reuses_earlier_siblings() {
        let first = Value::array([Value::Null]);
        let prev = Value::array([first.clone()]);
        let next = Value::array([Value::array([Value::Null]), Value::Boolean(true)]);
        let next = reconcile(Some(&prev), next);
        assert!(!next.same_ref(&prev));
        assert!(next.as_array().unwrap()[0].same_ref(&first));
    }

    #[test]
    fn wide_object_reconciles_by_key() {
        let wide = |n: u32| {
            Value::object(
                (0..n)
                    .map(|i| (alloc::format!("k{i}"), Value::array([Value::from(f64::from(i))])))
                    .collect(),
            )
        };
        let prev = wide(5_000);
        assert!(reconcile(Some(&prev), wide(5_000)).same_ref(&prev));

        let next = reconcile(Some(&prev), wide(5_001));
        assert!(!next.same_ref(&prev));
        assert!(next.get("k4999").unwrap().same_ref(prev.get("k4999").unwrap()));
    }

    #[test]
    fn key_order_change_is_a_change() {
        let prev = object([("a", Value::Null), ("b", Value::Null)]);
        let next = object([("b", Value::Null), ("a", Value::Null)]);
        assert!(!reconcile(Some(&prev), next).same_ref(&prev));
    }

    #[test]
    fn kind_change_takes_the_new_value() {
        let prev = Value::array([]);
        let next = reconcile(Some(&prev), Value::from("s"));
        assert_eq!(next, Value::from("s"));
        assert!(reconcile(None, Value::array([])).is_array());
    }
}
