//! Route enumeration from the docs directory.

use crate::error::SiteError;
use leaf_core::{FrontmatterMap, LeafError, SourceDocument};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory under the site root that holds the Markdown sources.
pub const DOCS_DIR: &str = "docs";

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// One page of the site.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    /// URL path, `/` for the root index.
    pub url_path: String,
    /// Absolute or root-relative path of the source file.
    pub source_file: PathBuf,
    /// Path under the docs directory with `/` separators.
    pub relative_path: String,
    /// `title` from frontmatter.
    pub title: Option<String>,
    /// `description` from frontmatter.
    pub description: Option<String>,
    /// All frontmatter keys.
    pub frontmatter: FrontmatterMap,
}

/// A file that could not become a route.
#[derive(Debug)]
pub struct RouteFailure {
    /// Offending file or directory.
    pub path: PathBuf,
    /// What went wrong.
    pub error: SiteError,
}

/// Routes in enumeration order, plus the files that failed.
#[derive(Debug, Default)]
pub struct RouteScan {
    /// Routes, sorted by file name at every directory level.
    pub routes: Vec<RouteRecord>,
    /// Files skipped because they could not be read or parsed.
    pub failures: Vec<RouteFailure>,
}

/// URL path for a source path relative to the docs directory.
///
/// ```
/// use leaf_site::routes::url_path_for;
///
/// assert_eq!(url_path_for("guide/index.md"), "/guide");
/// assert_eq!(url_path_for("index.md"), "/");
/// assert_eq!(url_path_for("api/config.md"), "/api/config");
/// ```
pub fn url_path_for(relative_path: &str) -> String {
    let stem = MARKDOWN_EXTENSIONS
        .iter()
        .find_map(|ext| relative_path.strip_suffix(&format!(".{}", ext)))
        .unwrap_or(relative_path);
    let url = format!("/{}", stem);
    match url.strip_suffix("/index") {
        Some("") => "/".to_string(),
        Some(parent) => parent.to_string(),
        None => url,
    }
}

/// Returns true for `.md` and `.mdx` files.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext))
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.depth() > 0 && (name == "node_modules" || name.starts_with('.'))
}

/// Enumerates every Markdown file under `docs_dir` and reads its frontmatter.
///
/// `node_modules` and hidden entries are skipped. Order is stable: entries
/// are sorted by file name within each directory.
pub fn generate_routes(docs_dir: &Path) -> RouteScan {
    let mut scan = RouteScan::default();
    let walker = WalkDir::new(docs_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(docs_dir).to_path_buf();
                scan.failures.push(RouteFailure {
                    error: SiteError::Read {
                        path: path.clone(),
                        source: err.into(),
                    },
                    path,
                });
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown(path) {
            continue;
        }

        log::debug!("Reading route source {}", path.display());
        match read_route(docs_dir, path) {
            Ok(route) => scan.routes.push(route),
            Err(error) => scan.failures.push(RouteFailure {
                path: path.to_path_buf(),
                error,
            }),
        }
    }

    scan
}

/// Reads one source file into a route record.
pub fn read_route(docs_dir: &Path, path: &Path) -> Result<RouteRecord, SiteError> {
    let content = std::fs::read_to_string(path).map_err(|source| SiteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = SourceDocument::parse(path, &content).map_err(|err| SiteError::Document {
        path: path.to_path_buf(),
        source: LeafError::from(err),
    })?;

    let relative_path = relative_slash_path(docs_dir, path);
    Ok(RouteRecord {
        url_path: url_path_for(&relative_path),
        source_file: path.to_path_buf(),
        title: document.title().map(str::to_string),
        description: document.description().map(str::to_string),
        relative_path,
        frontmatter: document.frontmatter,
    })
}

fn relative_slash_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
