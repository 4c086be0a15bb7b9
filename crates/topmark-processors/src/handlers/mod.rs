//! Built-in header processors

mod block_comment;
mod line_comment;
mod markdown;
mod xml;

pub use block_comment::BlockCommentProcessor;
pub use line_comment::LineCommentProcessor;
pub use markdown::MarkdownProcessor;
pub use xml::XmlProcessor;
