//! JavaScript routes-module generation for the client bundle.

use crate::routes::RouteRecord;
use leaf_core::FrontmatterMap;
use serde::Serialize;
use std::fmt::Write as FmtWrite;

/// Converts a Rust string to a JavaScript string literal.
///
/// ```
/// use leaf_site::codegen::js_string_literal;
///
/// assert_eq!(js_string_literal("docs/a.md"), "\"docs/a.md\"");
/// assert_eq!(js_string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
pub fn js_string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteData<'a> {
    title: Option<&'a str>,
    description: Option<&'a str>,
    relative_path: &'a str,
    frontmatter: &'a FrontmatterMap,
}

fn route_data_json(route: &RouteRecord) -> String {
    let data = RouteData {
        title: route.title.as_deref(),
        description: route.description.as_deref(),
        relative_path: &route.relative_path,
        frontmatter: &route.frontmatter,
    };
    serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string())
}

/// Emits the `routes` module: one import per route, keyed by enumeration
/// index, and an exported array of `{ path, component, toc, data }`.
pub fn generate_routes_module(routes: &[RouteRecord]) -> String {
    let mut code = String::new();

    for (i, route) in routes.iter().enumerate() {
        let source = route.source_file.to_string_lossy().replace('\\', "/");
        let _ = writeln!(
            code,
            "import Route{i}, {{ toc as toc{i} }} from {};",
            js_string_literal(&source)
        );
    }
    if !routes.is_empty() {
        code.push('\n');
    }

    code.push_str("export const routes = [\n");
    for (i, route) in routes.iter().enumerate() {
        let _ = writeln!(
            code,
            "  {{ path: {}, component: Route{i}, toc: toc{i}, data: {} }},",
            js_string_literal(&route.url_path),
            route_data_json(route)
        );
    }
    code.push_str("];\n");
    code
}
