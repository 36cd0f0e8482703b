//! Markdown parsing and the Markdown-stage transform pipeline.

use crate::components::{ComponentPlaceholder, extract_components};
use crate::error::{LeafError, ParseDiagnostics, SourceLocation};
use crate::toc::{TocEntry, extract_toc};
use crate::{badge, code_group, containers};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Allow raw HTML nodes in the AST.
    pub raw_html: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
}

impl ParseOptions {
    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::ParseOptions {
            constructs,
            math_text_single_dollar: self.math,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            raw_html: true,
            math: true,
        }
    }
}

/// A user-supplied transform run on the Markdown AST after the built-in stages.
pub trait MarkdownTransform: Send + Sync {
    /// Mutate the parsed markdown AST in place.
    fn transform(&self, root: &mut Node);
}

impl<F> MarkdownTransform for F
where
    F: Fn(&mut Node) + Send + Sync,
{
    fn transform(&self, root: &mut Node) {
        (self)(root)
    }
}

/// Per-document state threaded through the built-in stages.
#[derive(Debug, Default)]
pub struct DocumentState {
    /// Side table of extracted components, in placeholder order.
    pub components: Vec<ComponentPlaceholder>,
    /// Warnings about malformed syntax.
    pub diagnostics: ParseDiagnostics,
}

/// Signature shared by every built-in Markdown stage.
pub type Stage = fn(&mut Node, &mut DocumentState);

/// Built-in stages in execution order.
///
/// Code groups must run before containers: the container closer search
/// would otherwise claim the code group's `:::`.
pub const STAGES: [(&str, Stage); 4] = [
    ("badges", badge::transform_badges),
    ("code-groups", code_group::transform_code_groups),
    ("containers", containers::transform_containers),
    ("components", extract_components),
];

/// Output of the Markdown stage for one document.
#[derive(Debug)]
pub struct ParsedDocument {
    /// Transformed Markdown AST.
    pub root: Node,
    /// Level 2 and 3 headings in document order.
    pub toc: Vec<TocEntry>,
    /// Extracted component side table.
    pub components: Vec<ComponentPlaceholder>,
    /// Non-fatal warnings.
    pub diagnostics: ParseDiagnostics,
}

/// Parses Markdown and runs the built-in and user Markdown-stage transforms.
pub struct ParserPipeline {
    options: ParseOptions,
    transforms: Vec<Box<dyn MarkdownTransform>>,
}

impl ParserPipeline {
    /// Create a new pipeline.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            transforms: Vec::new(),
        }
    }

    /// Options the pipeline parses with.
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Add a transform that runs after the built-in stages and TOC extraction.
    pub fn add_transform<T: MarkdownTransform + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    /// Parse a document body.
    pub fn parse(&self, input: &str) -> Result<ParsedDocument, LeafError> {
        let mut root = parse_mdast(input, &self.options)?;
        let mut state = DocumentState::default();

        for (name, stage) in STAGES {
            log::trace!("markdown stage: {}", name);
            stage(&mut root, &mut state);
        }

        let toc = extract_toc(&root);

        for transform in &self.transforms {
            transform.transform(&mut root);
        }

        Ok(ParsedDocument {
            root,
            toc,
            components: state.components,
            diagnostics: state.diagnostics,
        })
    }
}

impl Default for ParserPipeline {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Parse markdown into an MDAST tree using core options.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, LeafError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| LeafError::Markdown {
        message: err.to_string(),
        location: message_location(&err),
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}
