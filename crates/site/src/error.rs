use leaf_core::LeafError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building a site. Each one names the file involved.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A source file or directory could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File or directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A document's frontmatter or Markdown was rejected.
    #[error("Failed to process {}: {source}", path.display())]
    Document {
        /// Source file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: LeafError,
    },
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid YAML or JSON for a site config.
    #[error("Invalid config {}: {message}", path.display())]
    ConfigParse {
        /// Config file path
        path: PathBuf,
        /// Parser message
        message: String,
    },
    /// An output file or directory could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The HTML template could not be rewritten for a page.
    #[error("Failed to render template for {}: {message}", path.display())]
    Template {
        /// Output path of the page
        path: PathBuf,
        /// Rewriter message
        message: String,
    },
}

impl SiteError {
    /// The file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            SiteError::Read { path, .. }
            | SiteError::Document { path, .. }
            | SiteError::ConfigRead { path, .. }
            | SiteError::ConfigParse { path, .. }
            | SiteError::Write { path, .. }
            | SiteError::Template { path, .. } => path,
        }
    }
}
