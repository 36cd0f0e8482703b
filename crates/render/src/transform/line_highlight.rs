//! `{2,4-6}` line highlighting and line numbers.

use super::StageContext;
use crate::renderer::{Element, HtmlNode, walk_elements_mut};
use std::ops::RangeInclusive;

const META_ATTRIBUTE: &str = "data-meta";

/// Parses the `{...}` part of a fence meta string into 1-based line ranges.
///
/// Other meta content, such as a `[label]` used by code groups, is ignored.
/// Malformed entries are skipped.
///
/// ```
/// use leaf_render::transform::line_highlight::parse_line_ranges;
///
/// let ranges = parse_line_ranges("[app.js] {1,3-4}");
/// assert_eq!(ranges, vec![1..=1, 3..=4]);
/// ```
pub fn parse_line_ranges(meta: &str) -> Vec<RangeInclusive<usize>> {
    let Some(open) = meta.find('{') else {
        return Vec::new();
    };
    let Some(len) = meta[open + 1..].find('}') else {
        return Vec::new();
    };

    meta[open + 1..open + 1 + len]
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (start.trim(), end.trim()),
                None => (part, part),
            };
            let start: usize = start.parse().ok()?;
            let end: usize = end.parse().ok()?;
            (start >= 1 && start <= end).then_some(start..=end)
        })
        .collect()
}

/// Annotates code lines and drops the transient `data-meta` attribute.
pub fn highlight_lines(nodes: &mut [HtmlNode], ctx: &StageContext<'_>) {
    let line_numbers = ctx.options.line_numbers;
    walk_elements_mut(nodes, &mut |element| {
        if element.tag != "pre" {
            return;
        }
        let Some(code) = element.child_element_mut("code") else {
            return;
        };
        let meta = code.remove_attribute(META_ATTRIBUTE).unwrap_or_default();
        let ranges = parse_line_ranges(&meta);
        if ranges.is_empty() && !line_numbers {
            return;
        }

        wrap_lines(code, &ranges);
        if !ranges.is_empty() {
            element.add_class("has-highlighted-lines");
        }
        if line_numbers {
            element.add_class("line-numbers-mode");
        }
    });
}

fn wrap_lines(code: &mut Element, ranges: &[RangeInclusive<usize>]) {
    let lines = split_lines(std::mem::take(&mut code.children));
    let count = lines.len();
    for (index, line) in lines.into_iter().enumerate() {
        let number = index + 1;
        let mut span = Element::new("span").with_attribute("class", "line");
        if ranges.iter().any(|range| range.contains(&number)) {
            span.add_class("highlighted");
        }
        code.children.push(span.with_children(line).into());
        if number < count {
            code.children.push(HtmlNode::text("\n"));
        }
    }
}

/// Splits code children into lines at newlines inside text and raw nodes.
///
/// A trailing newline does not start an extra line. Elements spanning a
/// newline stay whole on the line where they start.
fn split_lines(children: Vec<HtmlNode>) -> Vec<Vec<HtmlNode>> {
    let mut lines = vec![Vec::new()];
    for child in children {
        let (value, raw) = match child {
            HtmlNode::Text(value) => (value, false),
            HtmlNode::Raw(value) => (value, true),
            element => {
                push_to_last(&mut lines, element);
                continue;
            }
        };
        for (index, piece) in value.split('\n').enumerate() {
            if index > 0 {
                lines.push(Vec::new());
            }
            if !piece.is_empty() {
                let node = if raw {
                    HtmlNode::Raw(piece.to_string())
                } else {
                    HtmlNode::text(piece)
                };
                push_to_last(&mut lines, node);
            }
        }
    }
    if lines.len() > 1 && lines.last().is_some_and(Vec::is_empty) {
        lines.pop();
    }
    lines
}

fn push_to_last(lines: &mut [Vec<HtmlNode>], node: HtmlNode) {
    if let Some(line) = lines.last_mut() {
        line.push(node);
    }
}
