use rstest::rstest;

use crate::{Resolver, ResolverOptions, Shape, SyntaxError, split_at_offsets};

/// Feeds `src` as two fragments cut at every byte offset and checks that the
/// same error is reported each time.
fn assert_error_at_every_cut(src: &str, shape: Option<&Shape>, error: &SyntaxError, offset: usize) {
    for cut in 0..=src.len() {
        let mut r = Resolver::new(shape.cloned());
        for fragment in split_at_offsets(src, &[cut]) {
            r.parse_chunk(fragment);
        }
        let err = r
            .error()
            .unwrap_or_else(|| panic!("no error for {src:?} cut at {cut}"));
        assert_eq!(&err.source, error, "{src:?} cut at {cut}");
        assert_eq!(err.offset, offset, "{src:?} cut at {cut}");
        assert!(r.value().is_none());
        assert!(!r.is_complete());
    }
}

#[rstest]
#[case::trailing_comma_in_array("[1,]", SyntaxError::TrailingComma(']'), 3)]
#[case::trailing_comma_in_object(r#"{"a":1,}"#, SyntaxError::TrailingComma('}'), 7)]
#[case::bracket_after_comma(r#"{"a":1,]"#, SyntaxError::Expected("property name"), 7)]
#[case::unquoted_key("{a:1}", SyntaxError::Expected("property name"), 1)]
#[case::missing_colon(r#"{"a" 1}"#, SyntaxError::Expected("':'"), 5)]
#[case::missing_comma("[1 2]", SyntaxError::Expected("',' or ']'"), 3)]
#[case::missing_object_comma(r#"{"a":1 "b":2}"#, SyntaxError::Expected("',' or '}'"), 7)]
#[case::bad_literal("[nul]", SyntaxError::InvalidCharacter(']'), 4)]
#[case::leading_plus("+1", SyntaxError::InvalidCharacter('+'), 0)]
#[case::bare_minus("[-]", SyntaxError::InvalidCharacter(']'), 2)]
#[case::empty_fraction("[1.]", SyntaxError::InvalidCharacter(']'), 3)]
#[case::bad_escape(r#""\q""#, SyntaxError::InvalidCharacter('q'), 2)]
#[case::bad_hex(r#""\u12x4""#, SyntaxError::InvalidUnicodeEscapeChar('x'), 5)]
#[case::lone_low_surrogate(r#""\uDC00""#, SyntaxError::InvalidUnicodeEscapeSequence(0xDC00), 1)]
#[case::unpaired_high_surrogate(r#""\uD800!""#, SyntaxError::InvalidUnicodeEscapeSequence(0xD800), 1)]
#[case::raw_newline_in_string("\"a\nb\"", SyntaxError::InvalidCharacter('\n'), 2)]
#[case::second_root("{} {}", SyntaxError::TrailingCharacter('{'), 3)]
#[case::closing_bracket_first("]", SyntaxError::InvalidCharacter(']'), 0)]
#[case::non_ascii_garbage("[1,é]", SyntaxError::InvalidCharacter('é'), 3)]
fn malformed_input(#[case] src: &str, #[case] error: SyntaxError, #[case] offset: usize) {
    assert_error_at_every_cut(src, None, &error, offset);
}

#[rstest]
#[case::record(Shape::record([("a", Shape::string().eager())]))]
#[case::sequence(Shape::sequence(Shape::number()))]
#[case::union(Shape::union([Shape::string(), Shape::sequence(Shape::boolean())]))]
fn shape_does_not_change_syntax_errors(#[case] shape: Shape) {
    assert_error_at_every_cut(
        r#"{"a":"x",]"#,
        Some(&shape),
        &SyntaxError::Expected("property name"),
        9,
    );
}

#[test]
fn unexpected_end_of_input_after_finish() {
    for src in ["", "[", r#"{"a":"#, "\"abc", "tru", "-", "1e"] {
        let mut r = Resolver::new(None);
        r.parse_chunk(src);
        assert!(r.error().is_none(), "{src:?}");
        r.finish();
        let err = r.error().unwrap();
        assert_eq!(err.source, SyntaxError::UnexpectedEndOfInput, "{src:?}");
        assert_eq!(err.offset, src.len());
    }
}

#[test]
fn depth_limit_is_a_syntax_error() {
    let options = ResolverOptions {
        max_depth: 3,
        ..ResolverOptions::default()
    };
    let mut r = Resolver::with_options(None, options);
    r.parse_chunk("[[[");
    assert!(r.error().is_none());
    r.parse_chunk("[");
    assert_eq!(
        r.error().map(|e| e.source.clone()),
        Some(SyntaxError::DepthLimitExceeded(3))
    );
}
