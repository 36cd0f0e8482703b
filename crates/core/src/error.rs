use crate::frontmatter::FrontmatterError;
use markdown::mdast::Node;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Location of the first character of an mdast node, `1:1` for synthesized nodes.
    pub fn of_node(node: &Node) -> Self {
        node.position()
            .map(|position| Self::new(position.start.line, position.start.column))
            .unwrap_or_else(|| Self::new(1, 1))
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors that can occur while turning a source file into a parsed document.
#[derive(Debug, Error)]
pub enum LeafError {
    /// markdown-rs rejected the input.
    #[error("Parse error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// The leading metadata block could not be read.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

/// Non-fatal warnings that don't prevent rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A `::: type` opener without a matching `:::` closer.
    UnterminatedDirective {
        /// Where the opener paragraph starts
        location: SourceLocation,
        /// Directive type token (`tip`, `code-group`, ...)
        directive: String,
    },
    /// A `::: code-group` span holding something other than fenced code.
    MalformedCodeGroup {
        /// Where the opener paragraph starts
        location: SourceLocation,
        /// What was found instead of a fence
        found: String,
    },
}

impl ParseWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseWarning::UnterminatedDirective { location, .. } => location,
            ParseWarning::MalformedCodeGroup { location, .. } => location,
        }
    }

    fn location_mut(&mut self) -> &mut SourceLocation {
        match self {
            ParseWarning::UnterminatedDirective { location, .. } => location,
            ParseWarning::MalformedCodeGroup { location, .. } => location,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::UnterminatedDirective {
                location,
                directive,
            } => {
                write!(
                    f,
                    "{}: '::: {}' is never closed, left as plain text",
                    location, directive
                )
            }
            ParseWarning::MalformedCodeGroup { location, found } => {
                write!(
                    f,
                    "{}: code group contains {} instead of a fenced code block",
                    location, found
                )
            }
        }
    }
}

/// Collection of parse diagnostics for one document.
#[derive(Debug, Clone, Default)]
pub struct ParseDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<ParseWarning>,
}

impl ParseDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Attaches a file path and shifts every line by `lines`.
    ///
    /// Documents are parsed without their frontmatter, so positions start
    /// at the body; this maps them back onto the file on disk.
    pub fn relocate(&mut self, file: &str, lines: usize) {
        for warning in &mut self.warnings {
            let location = warning.location_mut();
            location.file = Some(file.to_string());
            location.line += lines;
        }
    }
}
