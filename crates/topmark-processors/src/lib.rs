//! Header processors for topmark
//!
//! A [`HeaderProcessor`] knows one comment syntax: how to find the
//! header's line range, parse its `key: value` fields, render a fresh
//! header, and where a new header goes. Processors are bound to file-type
//! names through a [`ProcessorRegistry`].

pub mod bounds;
pub mod fields;
pub mod handlers;
pub mod processor;
pub mod registry;
pub mod splice;
pub mod style;

pub use bounds::{HeaderBounds, InsertAnchor};
pub use fields::{FieldMap, ParsedFields};
pub use handlers::{BlockCommentProcessor, LineCommentProcessor, MarkdownProcessor, XmlProcessor};
pub use processor::HeaderProcessor;
pub use registry::ProcessorRegistry;
pub use splice::Padding;
pub use style::{CommentStyle, END_MARKER, LineKind, START_MARKER};
