/// Configuration options for a [`Resolver`](crate::Resolver).
///
/// # Examples
///
/// ```rust
/// use jsonresolve::{Resolver, ResolverOptions, Shape};
///
/// let options = ResolverOptions {
///     primitive_wrapper: Some("value"),
///     ..Default::default()
/// };
/// let mut resolver = Resolver::with_options(Some(Shape::string().eager()), options);
/// resolver.parse_chunk(r#"{"value":"hel"#);
/// assert_eq!(resolver.value().and_then(|v| v.as_str()), Some("hel"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Whether to allow any Unicode whitespace between JSON tokens.
    ///
    /// By default, only the four whitespace characters defined by the JSON
    /// specification are skipped: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Maximum nesting depth of arrays and objects.
    ///
    /// Deeper documents are reported as a syntax error rather than read.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,

    /// Name of the single field that wraps a non-record root value.
    ///
    /// Providers that only accept object-shaped structured output receive a
    /// schema of the form `{"<field>": <value>}`. When this is set and the
    /// shape root is not a record, a root object whose only key is this field
    /// is resolved as its inner value.
    ///
    /// # Default
    ///
    /// `None`
    pub primitive_wrapper: Option<&'static str>,

    /// Whether union values may arrive wrapped as `{"<index>": value}`.
    ///
    /// Providers that cannot express `anyOf` receive each variant as an object
    /// keyed by its position. When set, an object whose only entry has a
    /// numeric key that names a variant is resolved as that entry's value
    /// under that variant.
    ///
    /// # Default
    ///
    /// `false`
    pub union_envelope: bool,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on syntax errors instead of latching them.
    ///
    /// Enabled only in test and fuzz builds to produce backtraces.
    pub panic_on_error: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            allow_unicode_whitespace: false,
            max_depth: 128,
            primitive_wrapper: None,
            union_envelope: false,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}
