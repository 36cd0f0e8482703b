#![deny(missing_docs)]
//! Leaf render: Markdown AST to HTML, the HTML-stage post-transforms and
//! the per-document [`MarkdownProcessor`].

/// The per-document processor.
pub mod processor;
/// HTML tree, conversion and serialization.
pub mod renderer;
/// HTML-stage post-transforms.
pub mod transform;

pub use processor::{MarkdownProcessor, RenderOptions, RenderedDocument};
pub use renderer::{Element, HtmlNode, mdast_to_html, to_html};
pub use transform::HtmlTransform;
pub use transform::highlight::{Highlighter, SyntectHighlighter};
