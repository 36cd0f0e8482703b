//! Two-phase site build: enumerate every route, then render pages in parallel.

use crate::config::LeafConfig;
use crate::error::SiteError;
use crate::git;
use crate::navigation::{DocFooterData, doc_footer};
use crate::routes::{DOCS_DIR, RouteFailure, RouteRecord, generate_routes};
use leaf_core::{ComponentPlaceholder, LeafError, SourceDocument, TocEntry};
use leaf_render::MarkdownProcessor;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Options controlling a site build.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Worker thread count; `None` uses rayon's global pool.
    pub max_threads: Option<usize>,
    /// Keep rendering after a page fails. When false, pages render one at a
    /// time and the build stops at the first failure.
    pub continue_on_error: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_threads: None,
            continue_on_error: true,
        }
    }
}

/// Everything the client needs to show one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Route the page was rendered for.
    pub route: RouteRecord,
    /// Rendered body HTML.
    pub html: String,
    /// Table of contents.
    pub toc: Vec<TocEntry>,
    /// Component side table.
    pub components: Vec<ComponentPlaceholder>,
    /// Prev/next, edit link and last-updated flag.
    pub footer: DocFooterData,
    /// Unix timestamp of the last commit touching the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

/// A route whose page could not be rendered.
#[derive(Debug)]
pub struct PageFailure {
    /// The route.
    pub route: RouteRecord,
    /// Why it failed.
    pub error: SiteError,
}

/// Counters for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuildStats {
    /// Routes handed to the render phase.
    pub total: usize,
    /// Pages rendered.
    pub succeeded: usize,
    /// Pages that failed to render.
    pub failed: usize,
    /// Wall time of both phases in milliseconds.
    pub elapsed_ms: f64,
}

/// Result of [`SiteBuilder::build`].
#[derive(Debug, Default)]
pub struct SiteBuild {
    /// Rendered pages in route order.
    pub pages: Vec<PageData>,
    /// Files dropped during route enumeration.
    pub route_failures: Vec<RouteFailure>,
    /// Routes dropped during rendering.
    pub page_failures: Vec<PageFailure>,
    /// Counters.
    pub stats: BuildStats,
}

impl SiteBuild {
    /// True when nothing failed in either phase.
    pub fn is_clean(&self) -> bool {
        self.route_failures.is_empty() && self.page_failures.is_empty()
    }
}

/// Builds every page of a site rooted at a directory holding `docs/`.
pub struct SiteBuilder {
    root: PathBuf,
    config: LeafConfig,
    options: BuildOptions,
    processor: MarkdownProcessor,
}

impl SiteBuilder {
    /// A builder whose processor follows `config.markdown`.
    pub fn new(root: impl Into<PathBuf>, config: LeafConfig) -> Self {
        let processor = MarkdownProcessor::new(config.markdown.render_options());
        Self {
            root: root.into(),
            config,
            options: BuildOptions::default(),
            processor,
        }
    }

    /// Replace the build options.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Site configuration.
    pub fn config(&self) -> &LeafConfig {
        &self.config
    }

    /// The shared processor, for registering plugins before the build.
    pub fn processor_mut(&mut self) -> &mut MarkdownProcessor {
        &mut self.processor
    }

    /// Directory the routes are read from.
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join(DOCS_DIR)
    }

    /// Renders one route: read, split frontmatter, process, attach navigation.
    pub fn render_route(&self, route: &RouteRecord) -> Result<PageData, SiteError> {
        let path = &route.source_file;
        let content = std::fs::read_to_string(path).map_err(|source| SiteError::Read {
            path: path.clone(),
            source,
        })?;
        let document = SourceDocument::parse(path, &content)
            .map_err(|err| document_error(path, LeafError::from(err)))?;
        let rendered = self
            .processor
            .render_document(&document)
            .map_err(|err| document_error(path, err))?;

        for warning in &rendered.diagnostics.warnings {
            log::warn!("{}", warning);
        }

        let footer = doc_footer(route, &self.config.theme);
        let last_modified = if self.config.theme.last_updated {
            git::last_modified(path)
        } else {
            None
        };

        Ok(PageData {
            route: route.clone(),
            html: rendered.html,
            toc: rendered.toc,
            components: rendered.components,
            footer,
            last_modified,
        })
    }

    /// Runs both phases. Individual failures are collected, never fatal.
    pub fn build(&self) -> SiteBuild {
        let start = Instant::now();
        let docs_dir = self.docs_dir();

        let scan = generate_routes(&docs_dir);
        for failure in &scan.failures {
            log::warn!("Skipping {}: {}", failure.path.display(), failure.error);
        }
        log::info!("Found {} routes in {}", scan.routes.len(), docs_dir.display());

        let mut build = self.render_routes(scan.routes);
        build.route_failures = scan.failures;
        build.stats.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        log::info!(
            "Rendered {}/{} pages in {:.1}ms",
            build.stats.succeeded,
            build.stats.total,
            build.stats.elapsed_ms
        );
        build
    }

    /// Render phase over an already enumerated route list.
    pub fn render_routes(&self, routes: Vec<RouteRecord>) -> SiteBuild {
        let start = Instant::now();
        let pool = if let Some(max_threads) = self.options.max_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build()
                .ok()
        } else {
            None
        };

        let total = routes.len();
        let succeeded = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        let process_route = |route: RouteRecord| -> Result<PageData, PageFailure> {
            log::debug!("Rendering {}", route.url_path);
            match self.render_route(&route) {
                Ok(page) => {
                    succeeded.fetch_add(1, Ordering::Relaxed);
                    Ok(page)
                }
                Err(error) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Failed to render {}: {}", route.url_path, error);
                    Err(PageFailure { route, error })
                }
            }
        };

        let results: Vec<Result<PageData, PageFailure>> = if self.options.continue_on_error {
            if let Some(pool) = pool {
                pool.install(|| routes.into_par_iter().map(process_route).collect())
            } else {
                routes.into_par_iter().map(process_route).collect()
            }
        } else {
            // Stop on first error, so no parallelism
            let mut results = Vec::with_capacity(total);
            for route in routes {
                let result = process_route(route);
                let had_error = result.is_err();
                results.push(result);
                if had_error {
                    break;
                }
            }
            results
        };

        let mut build = SiteBuild::default();
        for result in results {
            match result {
                Ok(page) => build.pages.push(page),
                Err(failure) => build.page_failures.push(failure),
            }
        }
        build.stats = BuildStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        build
    }
}

fn document_error(path: &Path, source: LeafError) -> SiteError {
    SiteError::Document {
        path: path.to_path_buf(),
        source,
    }
}
