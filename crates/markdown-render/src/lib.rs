//! Configuration-driven Markdown→HTML conversion.
//!
//! The engine runs three stages per call — block segmentation, inline
//! transformation, HTML emission — under an immutable, pre-resolved option
//! set. Every conversion is a pure function of `(document, options)`: no
//! state crosses invocations, no I/O happens inside the engine, and
//! identical input always produces byte-identical output. Calls may run
//! concurrently without synchronization.
//!
//! ```
//! use markdown_render::{transform, OptionOverrides};
//!
//! let html = transform("# Hello, world", &OptionOverrides::default()).unwrap();
//! assert_eq!(html, "<h1>Hello, world</h1>");
//! ```

mod block;
mod emit;
mod emoji;
mod error;
mod header_id;
mod inline;
mod line;
mod metadata;

use std::collections::BTreeMap;

use tracing::debug;

pub use error::{RenderError, TransformError, MAX_NESTING_DEPTH};
pub use markdown_render_config::{
    resolve, BoolOrString, ConversionOptions, Flavor, HeaderIdPrefix, OptionOverrides,
    OptionsError,
};

/// Output of one conversion: the HTML plus any front-matter pairs the
/// document carried (empty unless the `metadata` option is on).
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub html: String,
    pub metadata: BTreeMap<String, String>,
}

/// The conversion boundary: owns a resolved option set and turns Markdown
/// documents into HTML on demand.
pub struct Converter {
    options: ConversionOptions,
}

impl Converter {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Resolve an override layer (flavor included) and build a converter
    /// from it.
    pub fn from_overrides(overrides: &OptionOverrides) -> Result<Self, OptionsError> {
        Ok(Self::new(resolve(overrides)?))
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert a document, returning HTML and extracted metadata.
    pub fn render(&self, md: &str) -> Result<Rendered, RenderError> {
        debug!(doc_len = md.len(), "converting markdown document");

        let mut lines = line::split_lines(md);
        if self.options.smart_indentation_fix {
            line::strip_common_indent(&mut lines);
        }

        let metadata = if self.options.metadata {
            metadata::extract(&mut lines)
        } else {
            BTreeMap::new()
        };

        let refs = block::collect_reference_definitions(&mut lines, self.options.gh_code_blocks);
        let blocks = block::parse_document(&lines, &self.options)?;
        debug!(blocks = blocks.len(), refs = refs.len(), "document segmented");

        let html = emit::Emitter::new(&self.options, &refs).render_document(&blocks, &metadata)?;
        Ok(Rendered { html, metadata })
    }

    /// Convert a document to an HTML string.
    pub fn make_html(&self, md: &str) -> Result<String, RenderError> {
        Ok(self.render(md)?.html)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

/// One-shot conversion boundary: resolve options, convert, return HTML.
/// Option and flavor errors propagate unchanged; there is nothing to retry.
pub fn transform(md: &str, overrides: &OptionOverrides) -> Result<String, TransformError> {
    let converter = Converter::from_overrides(overrides)?;
    Ok(converter.make_html(md)?)
}
