#![allow(missing_docs)]
#![allow(clippy::needless_raw_string_hashes)]

use jsonresolve::Shape;

#[allow(dead_code)]
pub const PAYLOAD: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null
    },
    "title": "Crash when saving",
    "labels": [
        "bug",
        "editor"
    ],
    "priority": 2,
    "steps": [
        {
            "action": "open",
            "target": "file.txt"
        },
        {
            "action": "save",
            "target": null
        }
    ],
    "body": "Saving a file with \"quotes\" fails.\nSee log."
}"#;

// A `create_ticket` tool call as a model streams it. Cuts fall inside
// strings, literals, keys, and escapes.
#[rustfmt::skip]
pub const STREAM: [&str; 8] = [
    r#"{"moderation":{"decision":"al"#,                      // inside an eager string
    r#"low","reason":null},"title":"Crash wh"#,              // nested record closes
    r#"en saving","labels":["bug","edi"#,                    // inside a lazy array element
    r#"tor"],"priority":"#,                                  // key without value
    r#"2,"steps":[{"action":"open","target":"file.txt"},{"act"#, // inside a key
    r#"ion":"save","target":nu"#,                            // inside a literal
    r#"ll}],"body":"Saving a file with \"quo"#,              // after an escape
    r#"tes\" fails.\nSee log."}"#,                           // closes the document
];

/// The shape the model was asked to follow.
pub fn ticket_shape() -> Shape {
    let nullable_string = || Shape::union([Shape::string(), Shape::null()]);
    Shape::record([
        (
            "moderation",
            Shape::record([
                ("decision", Shape::string().eager()),
                ("reason", nullable_string()),
            ]),
        ),
        ("title", Shape::string().eager()),
        ("labels", Shape::sequence(Shape::string())),
        ("priority", Shape::integer()),
        (
            "steps",
            Shape::sequence(Shape::record([
                ("action", Shape::string()),
                ("target", nullable_string()),
            ])),
        ),
        ("body", Shape::string().eager()),
    ])
}
