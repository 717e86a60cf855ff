#![expect(missing_docs)]

mod common;

use jsonresolve::{Resolver, SyntaxError, Value, produce_chunks, produce_prefixes};
use rstest::rstest;

const FIELDS: [&str; 6] = ["moderation", "title", "labels", "priority", "steps", "body"];

fn oracle() -> serde_json::Value {
    serde_json::from_str(common::PAYLOAD).unwrap()
}

fn as_json(value: &Value) -> serde_json::Value {
    serde_json::from_str(&value.to_string()).unwrap()
}

fn resolver() -> Resolver {
    Resolver::new(Some(common::ticket_shape()))
}

#[test]
fn streamed_payload_matches_oracle() {
    let mut r = resolver();
    for fragment in common::STREAM {
        r.parse_chunk(fragment);
        assert!(r.error().is_none(), "{fragment}");
    }
    assert!(r.is_complete());
    assert_eq!(as_json(r.value().unwrap()), oracle());
    assert_eq!(r.buffer(), serde_json::to_string(&oracle()).unwrap());
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
#[case(33)]
#[case(10_000)]
fn chunking_does_not_change_the_result(#[case] parts: usize) {
    let mut r = resolver();
    for chunk in produce_chunks(common::PAYLOAD, parts) {
        r.parse_chunk(chunk);
    }
    assert!(r.is_complete());
    assert_eq!(as_json(r.value().unwrap()), oracle());
}

#[test]
fn every_prefix_keeps_declared_fields_in_order() {
    for prefix in produce_prefixes(common::PAYLOAD, common::PAYLOAD.len()) {
        let mut r = resolver();
        r.parse_chunk(prefix);
        assert!(r.error().is_none(), "{prefix}");
        let value = r.value().unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, FIELDS, "{prefix}");
    }
}

#[test]
fn eager_strings_only_grow() {
    let mut r = resolver();
    let mut body = String::new();
    for chunk in produce_chunks(common::PAYLOAD, common::PAYLOAD.len()) {
        r.parse_chunk(chunk);
        let next = r.value().unwrap().get("body").unwrap().as_str().unwrap();
        assert!(next.starts_with(body.as_str()), "{body:?} -> {next:?}");
        body = next.to_string();
    }
    assert_eq!(body, "Saving a file with \"quotes\" fails.\nSee log.");
}

#[test]
fn lazy_values_appear_only_when_closed() {
    let mut r = resolver();
    for chunk in produce_chunks(common::PAYLOAD, common::PAYLOAD.len()) {
        r.parse_chunk(chunk);
        let value = r.value().unwrap();
        for label in value.get("labels").unwrap().as_array().unwrap() {
            assert!(matches!(label.as_str(), Some("bug" | "editor")), "{label}");
        }
        let priority = value.get("priority").unwrap();
        assert!(priority.is_pending() || priority.as_f64() == Some(2.0));
    }
}

#[test]
fn moderation_decision_is_visible_early() {
    let mut r = resolver();
    r.parse_chunk(common::STREAM[0]);
    let decision = r
        .value()
        .and_then(|v| v.get("moderation"))
        .and_then(|m| m.get("decision"))
        .and_then(Value::as_str);
    assert_eq!(decision, Some("al"));
    assert!(!r.is_complete());
}

#[test]
fn unchanged_branches_keep_their_reference() {
    let mut r = resolver();
    for fragment in &common::STREAM[..5] {
        r.parse_chunk(fragment);
    }
    let before = r.value().cloned().unwrap();
    for fragment in &common::STREAM[5..] {
        r.parse_chunk(fragment);
    }
    let after = r.value().unwrap();
    for key in ["moderation", "labels"] {
        assert!(after.get(key).unwrap().same_ref(before.get(key).unwrap()), "{key}");
    }
    assert!(!after.get("steps").unwrap().same_ref(before.get("steps").unwrap()));
    assert!(!after.same_ref(&before));
}

#[test]
fn error_position_and_message() {
    let mut r = resolver();
    r.parse_chunk(common::STREAM[0]);
    r.parse_chunk(r#"","title":}"#);
    let err = r.error().unwrap();
    assert_eq!(err.source, SyntaxError::InvalidCharacter('}'));
    assert_eq!(err.offset, 39);
    insta::assert_snapshot!(err.to_string(), @"invalid character '}' at 1:40");
    assert!(r.value().is_none());
    assert!(!r.parser_state().is_complete);
}

#[test]
fn reset_keeps_the_shape() {
    let mut r = resolver();
    r.parse_chunk("[");
    r.parse_chunk("oops");
    assert!(r.error().is_some());

    r.reset();
    assert!(r.value().is_none());
    assert_eq!(r.parser_state(), jsonresolve::ParserState::default());
    r.parse_chunk("");
    let keys: Vec<&str> = r.value().unwrap().as_object().unwrap().keys().collect();
    assert_eq!(keys, FIELDS);
}
