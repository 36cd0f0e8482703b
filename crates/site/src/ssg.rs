//! Static HTML emission: one `index.html` per page, rewritten from the client template.

use crate::build::PageData;
use crate::config::LeafConfig;
use crate::error::SiteError;
use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, rewrite_str};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Id of the script element carrying page data for client hydration.
pub const PRELOAD_SCRIPT_ID: &str = "__LEAF_PRELOAD__";

/// Minimal template used when the client bundle provides none.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <meta name="description" content="" />
    <title></title>
  </head>
  <body>
    <div id="app"></div>
  </body>
</html>
"#;

/// Output file for a URL path: `{out}/index.html` for `/`, else `{out}/{path}/index.html`.
pub fn html_path_for(out_dir: &Path, url_path: &str) -> PathBuf {
    let trimmed = url_path.trim_matches('/');
    if trimmed.is_empty() {
        out_dir.join("index.html")
    } else {
        trimmed
            .split('/')
            .fold(out_dir.to_path_buf(), |path, segment| path.join(segment))
            .join("index.html")
    }
}

/// What [`write_site`] managed to emit.
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Files written.
    pub written: Vec<PathBuf>,
    /// Pages that could not be written.
    pub failures: Vec<SiteError>,
}

/// `{page} | {site}`, or the site title alone for untitled pages.
pub fn page_title(page: &PageData, config: &LeafConfig) -> String {
    match page.route.title.as_deref() {
        Some(title) if !title.is_empty() => format!("{} | {}", title, config.title),
        _ => config.title.clone(),
    }
}

fn preload_json(page: &PageData) -> String {
    let data = json!({
        "toc": page.toc,
        "lastModified": page.last_modified,
        "docFooter": page.footer,
        "components": page.components,
    });
    // Keeps `</script>` in page data from closing the element early.
    data.to_string().replace("</", "<\\/")
}

/// Rewrites `template` for one page.
pub fn render_page(
    page: &PageData,
    template: &str,
    config: &LeafConfig,
    output: &Path,
) -> Result<String, SiteError> {
    let title = page_title(page, config);
    let description = page
        .route
        .description
        .as_deref()
        .unwrap_or(&config.description);
    let content = format!("<div class=\"markdown-content\">{}</div>", page.html);
    let preload = format!(
        "<script id=\"{}\" type=\"application/json\">{}</script>",
        PRELOAD_SCRIPT_ID,
        preload_json(page)
    );

    rewrite_str(
        template,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("title", |el| {
                    el.set_inner_content(&title, ContentType::Text);
                    Ok(())
                }),
                element!("meta[name=description]", |el| {
                    el.set_attribute("content", description)?;
                    Ok(())
                }),
                element!("#app", |el| {
                    el.set_inner_content(&content, ContentType::Html);
                    Ok(())
                }),
                element!("body", |el| {
                    el.append(&preload, ContentType::Html);
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| SiteError::Template {
        path: output.to_path_buf(),
        message: err.to_string(),
    })
}

fn write_page(
    page: &PageData,
    template: &str,
    config: &LeafConfig,
    output: &Path,
) -> Result<(), SiteError> {
    let html = render_page(page, template, config, output)?;
    let write_error = |source| SiteError::Write {
        path: output.to_path_buf(),
        source,
    };
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(output, html).map_err(write_error)
}

/// Writes every page under `out_dir`. A failed page is logged and skipped.
pub fn write_site(
    pages: &[PageData],
    out_dir: &Path,
    template: &str,
    config: &LeafConfig,
) -> EmitReport {
    log::info!("Generating static HTML for {} routes", pages.len());
    let mut report = EmitReport::default();

    for page in pages {
        let output = html_path_for(out_dir, &page.route.url_path);
        match write_page(page, template, config, &output) {
            Ok(()) => {
                log::debug!("Wrote {}", output.display());
                report.written.push(output);
            }
            Err(err) => {
                log::error!("{}", err);
                report.failures.push(err);
            }
        }
    }

    report
}
