#![deny(missing_docs)]
//! Leaf site: configuration, routes, navigation and the parallel site build
//! that turns a `docs/` directory into static HTML.

/// Two-phase parallel site build.
pub mod build;
/// JavaScript routes module for the client bundle.
pub mod codegen;
/// `leaf.config.*` loading.
pub mod config;
mod error;
/// Git last-updated lookup.
pub mod git;
/// Sidebar, prev/next and doc footer.
pub mod navigation;
/// Route enumeration.
pub mod routes;
/// Static HTML emission.
pub mod ssg;

pub use build::{BuildOptions, BuildStats, PageData, PageFailure, SiteBuild, SiteBuilder};
pub use codegen::generate_routes_module;
pub use config::{EditLinkConfig, LeafConfig, MarkdownConfig, ThemeConfig};
pub use error::SiteError;
pub use navigation::{DocFooterData, SidebarConfig, SidebarItem, doc_footer, prev_next, resolve_sidebar};
pub use routes::{RouteRecord, RouteScan, generate_routes, url_path_for};
pub use ssg::{EmitReport, html_path_for, write_site};
