//! `<Badge type="tip" text="NEW" />` shorthand.

use crate::components::raw_attributes;
use crate::parse::DocumentState;
use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use markdown::mdast::Node;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BADGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<Badge(\s[^>]*?)?\s*/>").expect("valid badge regex"));

/// Rewrites badge tags in raw HTML nodes into styled spans.
///
/// Runs before component extraction so badges never land in the side table.
pub fn transform_badges(node: &mut Node, state: &mut DocumentState) {
    if let Node::Html(html) = node {
        if BADGE.is_match(&html.value) {
            html.value = BADGE.replace_all(&html.value, render_badge).into_owned();
        }
        return;
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            transform_badges(child, state);
        }
    }
}

fn render_badge(captures: &Captures) -> String {
    let attrs = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let mut kind = "info";
    let mut text = "";
    for (name, value) in raw_attributes(attrs) {
        match name {
            "type" if !value.is_empty() => kind = value,
            "text" => text = value,
            _ => {}
        }
    }
    format!(
        "<span class=\"badge badge-{}\">{}</span>",
        encode_double_quoted_attribute(kind),
        encode_text(&decode_html_entities(text))
    )
}
