//! Table of contents extraction.

use crate::slug::slugify;
use markdown::mdast::{Heading, Node};
use serde::{Deserialize, Serialize};

/// A level 2 or 3 heading in document order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading text from its direct text children.
    pub text: String,
    /// Anchor id, identical to the `id` the HTML stage assigns.
    pub id: String,
    /// Heading depth, 2 or 3.
    pub level: u8,
}

/// Collects level 2 and 3 headings anywhere in the tree.
///
/// Only direct `Text` children contribute to the entry text; emphasis,
/// links and inline code inside a heading are skipped, matching the
/// HTML heading-id stage. Headings whose id would be empty are left out.
pub fn extract_toc(root: &Node) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    collect(root, &mut entries);
    entries
}

fn collect(node: &Node, entries: &mut Vec<TocEntry>) {
    if let Node::Heading(heading) = node {
        if matches!(heading.depth, 2 | 3) {
            let text = heading_text(heading);
            let id = slugify(&text);
            if !id.is_empty() {
                entries.push(TocEntry {
                    text,
                    id,
                    level: heading.depth,
                });
            }
        }
        return;
    }
    for child in node.children().into_iter().flatten() {
        collect(child, entries);
    }
}

/// Concatenates the direct text children of a heading.
pub fn heading_text(heading: &Heading) -> String {
    heading
        .children
        .iter()
        .filter_map(|child| match child {
            Node::Text(text) => Some(text.value.as_str()),
            _ => None,
        })
        .collect()
}
