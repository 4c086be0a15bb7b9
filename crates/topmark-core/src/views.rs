//! Phase-scoped payloads attached to a processing context
//!
//! Each view is filled by one step and read by later ones. Every view is
//! optional: a step that halts early simply leaves the later views empty.

use std::fmt;

use topmark_processors::FieldMap;

/// Drop a payload once nothing downstream needs it.
pub trait Releasable {
    /// Free the payload. Calling this more than once is a no-op.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// A file image as newline-terminated lines.
///
/// Most images are plain vectors. An unchanged file is planned as a lazy
/// mirror of the original so that nothing is copied unless a consumer
/// actually asks for the lines.
pub enum Image {
    Materialized(Vec<String>),
    Lazy(Box<dyn Iterator<Item = String> + Send>),
}

impl Image {
    /// Collect a lazy image in place and return the lines.
    pub fn materialize(&mut self) -> &[String] {
        if let Image::Lazy(iter) = self {
            let lines: Vec<String> = iter.collect();
            *self = Image::Materialized(lines);
        }
        match self {
            Image::Materialized(lines) => lines.as_slice(),
            Image::Lazy(_) => &[],
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            Image::Materialized(lines) => lines,
            Image::Lazy(iter) => iter.collect(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Image::Lazy(_))
    }

    /// Concatenated text. Materializes a lazy image first.
    pub fn text(&mut self) -> String {
        self.materialize().concat()
    }
}

impl From<Vec<String>> for Image {
    fn from(lines: Vec<String>) -> Self {
        Image::Materialized(lines)
    }
}

impl Releasable for Image {
    fn release(&mut self) {
        *self = Image::Materialized(Vec::new());
    }

    fn is_released(&self) -> bool {
        matches!(self, Image::Materialized(lines) if lines.is_empty())
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Image::Materialized(lines) => f.debug_tuple("Materialized").field(&lines.len()).finish(),
            Image::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// The original file, BOM stripped.
#[derive(Debug, Clone, Default)]
pub struct FileImageView {
    pub lines: Vec<String>,
}

/// An existing header located by the scanner.
#[derive(Debug, Clone, Default)]
pub struct HeaderView {
    /// First line of the span.
    pub start: usize,
    /// One past the last line of the span.
    pub end: usize,
    pub lines: Vec<String>,
    /// `lines` concatenated.
    pub block: String,
    pub fields: FieldMap,
    /// Lines that parsed as fields.
    pub success: usize,
    /// Lines that did not.
    pub errors: usize,
    /// Leading whitespace of the first header line.
    pub indent: String,
}

#[derive(Debug, Clone, Default)]
pub struct BuilderView {
    /// Every built-in field, regardless of selection.
    pub builtins: FieldMap,
    /// The configured fields, in configured order.
    pub selected: FieldMap,
}

#[derive(Debug, Clone, Default)]
pub struct RenderView {
    pub lines: Vec<String>,
    pub block: String,
}

/// The planned image, BOM included.
#[derive(Debug)]
pub struct UpdatedView {
    pub image: Image,
}

#[derive(Debug, Clone, Default)]
pub struct DiffView {
    pub text: String,
}

/// All views of one file.
#[derive(Debug, Default)]
pub struct Views {
    pub image: Option<FileImageView>,
    pub header: Option<HeaderView>,
    pub build: Option<BuilderView>,
    pub render: Option<RenderView>,
    pub updated: Option<UpdatedView>,
    pub diff: Option<DiffView>,
}

impl Views {
    /// Lines of the original image, empty when the reader never ran.
    pub fn image_lines(&self) -> &[String] {
        self.image.as_ref().map(|v| v.lines.as_slice()).unwrap_or(&[])
    }
}

/// Releasing views drops the original image and the rendered header.
/// The detected header, built fields, planned image and diff stay
/// available for reporting.
impl Releasable for Views {
    fn release(&mut self) {
        self.image = None;
        self.render = None;
    }

    fn is_released(&self) -> bool {
        self.image.is_none() && self.render.is_none()
    }
}
