//! The per-document Markdown to HTML processor.

use crate::renderer::{mdast_to_html, to_html};
use crate::transform::highlight::{SyntectHighlighter, Highlighter};
use crate::transform::{HtmlTransform, StageContext, run_stages};
use leaf_core::{
    ComponentPlaceholder, LeafError, MarkdownTransform, ParseDiagnostics, ParseOptions,
    ParserPipeline, SourceDocument, TocEntry,
};

/// Rendering switches, usually taken from the site's `markdown` config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Parse `$..$` math and render it for KaTeX.
    pub math: bool,
    /// Split every code block into numbered line spans.
    pub line_numbers: bool,
    /// Add copy buttons to code blocks.
    pub copy_code: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            math: true,
            line_numbers: false,
            copy_code: false,
        }
    }
}

/// Everything produced for one document.
#[derive(Debug)]
pub struct RenderedDocument {
    /// Serialized HTML.
    pub html: String,
    /// Level 2 and 3 headings; each id matches a heading id in `html`.
    pub toc: Vec<TocEntry>,
    /// Side table for the component placeholders in `html`.
    pub components: Vec<ComponentPlaceholder>,
    /// Non-fatal warnings.
    pub diagnostics: ParseDiagnostics,
}

/// Runs the full pipeline: Markdown stages, HTML conversion, HTML stages, serialization.
///
/// One processor is shared by every worker of a site build, so plugins and
/// the highlighter must be `Send + Sync`.
pub struct MarkdownProcessor {
    options: RenderOptions,
    parser: ParserPipeline,
    highlighter: Box<dyn Highlighter>,
    html_transforms: Vec<Box<dyn HtmlTransform>>,
}

impl MarkdownProcessor {
    /// Create a processor with the default highlighter and no plugins.
    pub fn new(options: RenderOptions) -> Self {
        let parse_options = ParseOptions {
            math: options.math,
            ..ParseOptions::default()
        };
        Self {
            options,
            parser: ParserPipeline::new(parse_options),
            highlighter: Box::new(SyntectHighlighter),
            html_transforms: Vec::new(),
        }
    }

    /// Options this processor renders with.
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Replace the highlighter.
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Add a Markdown-stage plugin; runs after the built-in stages, in registration order.
    pub fn add_markdown_transform<T: MarkdownTransform + 'static>(&mut self, transform: T) {
        self.parser.add_transform(transform);
    }

    /// Add an HTML-stage plugin; runs after the built-in stages, in registration order.
    pub fn add_html_transform<T: HtmlTransform + 'static>(&mut self, transform: T) {
        self.html_transforms.push(Box::new(transform));
    }

    /// Render a Markdown body (without frontmatter).
    pub fn render(&self, markdown: &str) -> Result<RenderedDocument, LeafError> {
        let parsed = self.parser.parse(markdown)?;
        let mut nodes = mdast_to_html(&parsed.root);

        let ctx = StageContext {
            options: &self.options,
            highlighter: self.highlighter.as_ref(),
        };
        run_stages(&mut nodes, &ctx);
        for transform in &self.html_transforms {
            transform.transform(&mut nodes);
        }

        Ok(RenderedDocument {
            html: to_html(&nodes),
            toc: parsed.toc,
            components: parsed.components,
            diagnostics: parsed.diagnostics,
        })
    }

    /// Render a source document; diagnostics point into the file on disk.
    pub fn render_document(&self, document: &SourceDocument) -> Result<RenderedDocument, LeafError> {
        let mut rendered = self.render(&document.body)?;
        rendered.diagnostics.relocate(
            &document.path.to_string_lossy(),
            document.body_line.saturating_sub(1),
        );
        Ok(rendered)
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
