#![deny(missing_docs)]
//! Leaf core: source documents, frontmatter, Markdown-stage transforms, slugs and the TOC.

/// `<Badge />` shorthand rewriting.
pub mod badge;
/// `::: code-group` tabbed code blocks.
pub mod code_group;
/// Inline component extraction and prop coercion.
pub mod components;
/// `::: type title` custom containers.
pub mod containers;
/// Directive marker parsing shared by containers and code groups.
pub mod directives;
/// Core error and diagnostic types.
pub mod error;
/// Source documents and YAML frontmatter.
pub mod frontmatter;
/// Markdown parsing and the Markdown-stage pipeline.
pub mod parse;
/// Slug generation.
pub mod slug;
/// Table of contents extraction.
pub mod toc;

pub use code_group::CodeGroupTab;
pub use components::{ComponentPlaceholder, coerce_prop_value, parse_attributes};
pub use directives::DirectiveOpening;
pub use error::{LeafError, ParseDiagnostics, ParseWarning, SourceLocation};
pub use frontmatter::{FrontmatterError, FrontmatterMap, SourceDocument, split_frontmatter};
pub use parse::{
    DocumentState, MarkdownTransform, ParseOptions, ParsedDocument, ParserPipeline, parse_mdast,
};
pub use slug::slugify;
pub use toc::{TocEntry, extract_toc};
