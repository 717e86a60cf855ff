//! Reacts to content-moderation feedback while a tool-call response from an
//! LLM is still streaming.
//!
//! The assistant was prompted with a tool whose arguments follow this shape:
//!
//! ```text
//! {
//!   "moderation": {
//!     "decision": "allow" | "block",
//!     "reason":   string | null
//!   },
//!   "filename":   string,
//!   "language":   string,
//!   "code":       string
//! }
//! ```
//!
//! The document arrives in small, irregular fragments, the way chat
//! completion APIs deliver tokens. `moderation.decision` and `code` are eager,
//! so their text is visible before the closing quote arrives:
//!
//! 1. As soon as the decision reads `"block"` processing stops, before the
//!    rest of the payload has arrived.
//! 2. New text of `code` is printed as it arrives, as a UI would render it.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsonresolve --example llm_tool_call
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use jsonresolve::{Resolver, Shape, Value};

fn tool_shape() -> Shape {
    Shape::record([
        (
            "moderation",
            Shape::record([
                ("decision", Shape::string().eager()),
                ("reason", Shape::union([Shape::string(), Shape::null()])),
            ]),
        ),
        ("filename", Shape::string()),
        ("language", Shape::string()),
        ("code", Shape::string().eager()),
    ])
}

fn field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(key))
}

fn main() {
    let simulated_stream: [&str; 10] = [
        r#"{"moderation":{"decision":"al"#,
        r#"lo"#,
        r#"w","reason":null},"#,
        r#""filename":"example.rs","#,
        r#""language":"rust","#,
        r#""code":"use jsonresolve::{Resolver, "#,
        r#"Shape};\nfn main() {\n"#,
        r#"    let _resolver = Resolver::new(Some(Shape::string()));\n"#,
        r#"    println!(\"Hello from jsonresolve!\");\n}\n"#,
        r#""}"#,
    ];

    let mut resolver = Resolver::new(Some(tool_shape()));
    let mut printed = 0;

    for fragment in simulated_stream {
        resolver.parse_chunk(fragment);
        if let Some(err) = resolver.error() {
            eprintln!("malformed tool call: {err}");
            return;
        }
        let Some(value) = resolver.value() else {
            continue;
        };

        let decision = field(value, &["moderation", "decision"]).and_then(Value::as_str);
        if decision == Some("block") {
            let reason = field(value, &["moderation", "reason"]).and_then(Value::as_str);
            eprintln!("blocked by moderation: {}", reason.unwrap_or("no reason given"));
            return;
        }

        if let Some(code) = field(value, &["code"]).and_then(Value::as_str) {
            print!("{}", &code[printed..]);
            printed = code.len();
        }
    }

    resolver.finish();
    let state = resolver.parser_state();
    println!("\n-- complete: {}, error: {:?}", state.is_complete, state.error);
    if let Some(filename) = resolver.value().and_then(|v| field(v, &["filename"])) {
        println!("-- filename: {filename}");
    }
}
