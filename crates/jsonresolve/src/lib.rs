//! Shape-aware resolution of streamed JSON.
//!
//! Language models emit structured output token by token. This crate turns
//! each growing prefix of such a document into the best partial value it
//! admits, guided by an optional [`Shape`] describing what the model was
//! asked to produce:
//!
//! ```rust
//! use jsonresolve::{Resolver, Shape};
//!
//! let mut resolver = Resolver::new(Some(Shape::sequence(Shape::string()).eager()));
//! resolver.parse_chunk(r#"["a","b"#);
//! let before = resolver.value().cloned().unwrap();
//! assert_eq!(before.to_string(), r#"["a"]"#);
//!
//! resolver.parse_chunk("c");
//! assert!(resolver.value().unwrap().same_ref(&before));
//! ```
//!
//! Text is accumulated and re-read in full on every fragment, so the result
//! never depends on where fragments were cut. Unchanged branches of the
//! resolved tree keep their allocation between calls, letting consumers
//! detect changes by reference.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod builder;
mod chunk_utils;
mod error;
mod escape_buffer;
mod literal_buffer;
mod map;
mod memo;
mod options;
mod reader;
mod resolver;
mod shape;
mod value;

#[cfg(test)]
mod tests;

pub use chunk_utils::{produce_chunks, produce_prefixes, split_at_offsets};
pub use error::{ResolveError, SyntaxError};
pub use map::{Iter as MapIter, Map};
pub use options::ResolverOptions;
pub use resolver::{ParserState, Resolver};
pub use shape::{Field, LeafKind, Shape};
pub use value::Value;
