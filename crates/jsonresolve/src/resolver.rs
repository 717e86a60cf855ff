use alloc::string::String;

use tracing::{debug, trace};

use crate::{
    builder::Builder,
    error::ResolveError,
    memo::reconcile,
    options::ResolverOptions,
    reader::{Outcome, Reader},
    shape::Shape,
    value::Value,
};

/// Snapshot of a [`Resolver`]'s parse status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParserState {
    /// The root value is closed and only whitespace follows it.
    pub is_complete: bool,
    /// The latched syntax error, if any.
    pub error: Option<ResolveError>,
}

/// A streaming session that resolves a JSON document one fragment at a time.
///
/// Fragments are appended to an internal buffer and the whole buffer is read
/// again on every call, so fragment boundaries never matter: any split of the
/// same text yields the same final value. After each call, [`Resolver::value`]
/// holds the best partial value the text admits under the session's
/// [`Shape`]. Containers whose content did not change keep their previous
/// allocation; see [`Value::same_ref`].
///
/// A syntax error is sticky: it clears the value, and further fragments are
/// ignored until [`Resolver::reset`].
///
/// # Examples
///
/// ```rust
/// use jsonresolve::{Resolver, Shape};
///
/// let shape = Shape::record([
///     ("a", Shape::sequence(Shape::string()).eager()),
///     ("b", Shape::sequence(Shape::string()).eager()),
/// ]);
/// let mut resolver = Resolver::new(Some(shape));
///
/// resolver.parse_chunk(r#"{"a":["x"],"#);
/// let first = resolver.value().cloned().unwrap();
/// assert_eq!(first.to_string(), r#"{"a":["x"],"b":[]}"#);
///
/// resolver.parse_chunk(r#""b":["y"]}"#);
/// let second = resolver.value().unwrap();
/// assert_eq!(second.to_string(), r#"{"a":["x"],"b":["y"]}"#);
/// assert!(second.get("a").unwrap().same_ref(first.get("a").unwrap()));
/// assert!(resolver.parser_state().is_complete);
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    shape: Option<Shape>,
    options: ResolverOptions,
    buffer: String,
    value: Option<Value>,
    error: Option<ResolveError>,
    is_complete: bool,
    finished: bool,
}

impl Resolver {
    /// Creates a session. Without a shape, every closed value surfaces as-is.
    #[must_use]
    pub fn new(shape: Option<Shape>) -> Self {
        Self::with_options(shape, ResolverOptions::default())
    }

    /// Creates a session with explicit options.
    #[must_use]
    pub fn with_options(shape: Option<Shape>, options: ResolverOptions) -> Self {
        Self {
            shape,
            options,
            buffer: String::new(),
            value: None,
            error: None,
            is_complete: false,
            finished: false,
        }
    }

    /// Appends a fragment and re-resolves the document.
    ///
    /// Does nothing once a syntax error has latched.
    pub fn parse_chunk(&mut self, chunk: &str) {
        if self.error.is_some() {
            trace!(len = chunk.len(), "fragment ignored after syntax error");
            return;
        }
        self.buffer.push_str(chunk);
        self.refresh();
        trace!(
            len = chunk.len(),
            buffered = self.buffer.len(),
            complete = self.is_complete,
            "fragment resolved"
        );
    }

    /// Declares that no more text is coming.
    ///
    /// A trailing root number is closed, and a document that is still open
    /// becomes an "unexpected end of input" error.
    pub fn finish(&mut self) {
        if self.error.is_some() || self.finished {
            return;
        }
        self.finished = true;
        self.refresh();
        debug!(
            buffered = self.buffer.len(),
            complete = self.is_complete,
            "input finished"
        );
    }

    /// The value resolved from the text seen so far.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The latched syntax error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ResolveError> {
        self.error.as_ref()
    }

    /// Whether the root value is closed with only whitespace after it.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Completeness and error state in one snapshot.
    #[must_use]
    pub fn parser_state(&self) -> ParserState {
        ParserState {
            is_complete: self.is_complete,
            error: self.error.clone(),
        }
    }

    /// Discards all text, the value, and any error. The shape and options
    /// are kept.
    pub fn reset(&mut self) {
        debug!(
            buffered = self.buffer.len(),
            had_error = self.error.is_some(),
            "resolver reset"
        );
        self.buffer.clear();
        self.value = None;
        self.error = None;
        self.is_complete = false;
        self.finished = false;
    }

    /// The text accumulated so far.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The shape this session resolves against.
    #[must_use]
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// The options this session was created with.
    #[must_use]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    fn refresh(&mut self) {
        let reader = Reader::new(&self.buffer, &self.options).end_of_input(self.finished);
        let (root, complete) = match reader.read_document() {
            Outcome::Closed { node, .. } => (Some(node), true),
            Outcome::Unterminated { node } => (node, false),
            Outcome::Malformed(m) => {
                let error = ResolveError::locate(m.error, &self.buffer, m.offset);
                debug!(offset = error.offset, %error, "syntax error latched");
                #[cfg(any(test, feature = "fuzzing"))]
                assert!(!self.options.panic_on_error, "syntax error: {error}");
                self.value = None;
                self.is_complete = false;
                self.error = Some(error);
                return;
            }
        };
        let next = Builder::new(self.shape.as_ref(), &self.options).build(root.as_ref());
        self.value = next.map(|v| reconcile(self.value.as_ref(), v));
        self.is_complete = complete;
    }
}
