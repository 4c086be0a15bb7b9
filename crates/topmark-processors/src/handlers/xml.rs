//! XML-family processor (XML, SVG, HTML)

use topmark_filetypes::HeaderPolicy;
use topmark_filetypes::probes::xml_prolog_end;

use crate::bounds::InsertAnchor;
use crate::processor::HeaderProcessor;
use crate::style::CommentStyle;

/// Wraps the header in `<!-- ... -->` and places it after any XML
/// declaration or DOCTYPE.
///
/// A prolog that ends the file without a line break gains one on insert,
/// and stripping keeps it: the stripped image is the prolog terminated.
#[derive(Debug, Clone)]
pub struct XmlProcessor {
    style: CommentStyle,
}

impl XmlProcessor {
    pub const fn new() -> Self {
        Self {
            style: CommentStyle::wrapped("<!--", "", "-->"),
        }
    }
}

impl Default for XmlProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderProcessor for XmlProcessor {
    fn name(&self) -> &str {
        "xml"
    }

    fn style(&self) -> &CommentStyle {
        &self.style
    }

    fn insert_anchor(&self, lines: &[String], _policy: &HeaderPolicy) -> Option<InsertAnchor> {
        let text: String = lines.concat();
        match xml_prolog_end(&text) {
            Some(offset) => Some(InsertAnchor::Offset(offset)),
            None => Some(InsertAnchor::Line(0)),
        }
    }
}
