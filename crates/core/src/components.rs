//! Capitalized custom tags inside raw HTML, replaced by placeholders.
//!
//! Every `<Name ... />` found in an HTML node becomes
//! `<div data-leaf-component="__LEAF_COMPONENT_n__"></div>` and its
//! attributes are recorded in the document's side table so the rendering
//! layer can mount the real component at that anchor. Tags inside
//! `<!-- -->` comments are left as written.

use crate::parse::DocumentState;
use markdown::mdast::Node;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use std::ops::Range;

static TAG_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Z][A-Za-z0-9]*)").expect("valid tag regex"));

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z][A-Za-z0-9_-]*)=(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});

/// Attribute name used on placeholder elements.
pub const PLACEHOLDER_ATTRIBUTE: &str = "data-leaf-component";

/// An extracted component: the side-table entry for one placeholder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentPlaceholder {
    /// Placeholder id, unique within the document.
    pub id: String,
    /// Tag name as written.
    pub name: String,
    /// Coerced attribute values.
    pub props: Map<String, Value>,
}

/// Id for the `index`-th component of a document.
pub fn placeholder_id(index: usize) -> String {
    format!("__LEAF_COMPONENT_{}__", index)
}

/// Markup that replaces a component tag.
pub fn placeholder_html(id: &str) -> String {
    format!("<div {}=\"{}\"></div>", PLACEHOLDER_ATTRIBUTE, id)
}

/// Replaces component tags in every raw HTML node of the tree.
pub fn extract_components(root: &mut Node, state: &mut DocumentState) {
    let mut unclosed = HashSet::new();
    visit_html(root, &mut |value: &mut String| {
        if let Some(rewritten) = rewrite_html(value, &mut state.components, &mut unclosed) {
            *value = rewritten;
        }
    });
}

fn visit_html(node: &mut Node, f: &mut impl FnMut(&mut String)) {
    if let Node::Html(html) = node {
        f(&mut html.value);
        return;
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            visit_html(child, f);
        }
    }
}

/// Rewrites one HTML fragment, returning `None` when nothing matched.
fn rewrite_html(
    value: &str,
    table: &mut Vec<ComponentPlaceholder>,
    unclosed: &mut HashSet<String>,
) -> Option<String> {
    let mut source = value.to_string();
    let mut changed = false;

    // Closing tags for components opened in an earlier node. Only a closer
    // ahead of this node's own opener of the same name belongs to them.
    for name in unclosed.clone() {
        let comments = comment_spans(&source);
        let closing = format!("</{}>", name);
        let Some(at) = find_outside(&source, 0, &closing, &comments) else {
            continue;
        };
        if first_opener(&source, &name, &comments).is_some_and(|open| open < at) {
            continue;
        }
        source.replace_range(at..at + closing.len(), "");
        unclosed.remove(&name);
        changed = true;
    }

    let comments = comment_spans(&source);
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    while let Some(captures) = TAG_START.captures_at(&source, cursor) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        let start = whole.start();
        let name_end = whole.end();
        let name = name.as_str();

        if let Some(comment) = comments.iter().find(|span| span.contains(&start)) {
            output.push_str(&source[cursor..comment.end]);
            cursor = comment.end;
            continue;
        }
        if !at_name_boundary(&source, name_end) {
            output.push_str(&source[cursor..name_end]);
            cursor = name_end;
            continue;
        }

        let Some(close) = find_tag_end(&source[start..]) else {
            break;
        };
        let tag_end = start + close + 1;
        let inner = source[name_end..tag_end - 1].trim_end();
        let self_closing = inner.ends_with('/');
        let mut props = parse_attributes(inner.trim_end_matches('/'));

        let mut span_end = tag_end;
        if !self_closing {
            let closing = format!("</{}>", name);
            match find_outside(&source, tag_end, &closing, &comments) {
                Some(at) => {
                    let children = source[tag_end..at].trim();
                    if !children.is_empty() {
                        props.insert("children".to_string(), Value::String(children.to_string()));
                    }
                    span_end = at + closing.len();
                }
                None => {
                    unclosed.insert(name.to_string());
                }
            }
        }

        let id = placeholder_id(table.len());
        output.push_str(&source[cursor..start]);
        output.push_str(&placeholder_html(&id));
        table.push(ComponentPlaceholder {
            id,
            name: name.to_string(),
            props,
        });
        cursor = span_end;
        changed = true;
    }

    if !changed {
        return None;
    }
    output.push_str(&source[cursor..]);
    Some(output)
}

fn at_name_boundary(source: &str, name_end: usize) -> bool {
    source[name_end..]
        .chars()
        .next()
        .is_some_and(|ch| ch.is_whitespace() || ch == '/' || ch == '>')
}

/// Byte ranges of `<!-- -->` comments; an unterminated one runs to the end.
fn comment_spans(source: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(offset) = source[from..].find("<!--") {
        let start = from + offset;
        let end = source[start + 4..]
            .find("-->")
            .map_or(source.len(), |close| start + 4 + close + 3);
        spans.push(start..end);
        from = end;
    }
    spans
}

fn find_outside(source: &str, from: usize, needle: &str, comments: &[Range<usize>]) -> Option<usize> {
    source[from..]
        .match_indices(needle)
        .map(|(offset, _)| from + offset)
        .find(|at| !comments.iter().any(|span| span.contains(at)))
}

fn first_opener(source: &str, name: &str, comments: &[Range<usize>]) -> Option<usize> {
    TAG_START.captures_iter(source).find_map(|captures| {
        let whole = captures.get(0)?;
        let start = whole.start();
        let matches = captures.get(1)?.as_str() == name
            && at_name_boundary(source, whole.end())
            && !comments.iter().any(|span| span.contains(&start));
        matches.then_some(start)
    })
}

/// Position of the `>` closing the tag at the start of `tag`, skipping quoted values.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, ch) in tag.char_indices().skip(1) {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(index),
            (None, _) => {}
        }
    }
    None
}

/// Parses `name="value"` / `name='value'` pairs into coerced props.
pub fn parse_attributes(attrs: &str) -> Map<String, Value> {
    raw_attributes(attrs)
        .map(|(name, raw)| (name.to_string(), coerce_prop_value(raw)))
        .collect()
}

/// Quoted attribute pairs without coercion.
pub(crate) fn raw_attributes(attrs: &str) -> impl Iterator<Item = (&str, &str)> {
    ATTRIBUTE.captures_iter(attrs).filter_map(|captures| {
        let name = captures.get(1)?.as_str();
        let value = captures.get(2).or_else(|| captures.get(3))?.as_str();
        Some((name, value))
    })
}

/// Coerces an attribute string to a typed value.
///
/// Tried in order: JSON, a finite number, `true`/`false`, the string itself.
/// A quoted numeral such as `"42"` therefore becomes the number 42; there is
/// no way to force it to stay a string.
pub fn coerce_prop_value(raw: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return value;
    }

    let trimmed = raw.trim();
    if !trimmed.is_empty()
        && let Ok(number) = trimmed.parse::<f64>()
        && let Some(value) = number_value(number)
    {
        return value;
    }

    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn number_value(number: f64) -> Option<Value> {
    if !number.is_finite() {
        return None;
    }
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        return Some(Value::from(number as i64));
    }
    Number::from_f64(number).map(Value::Number)
}
