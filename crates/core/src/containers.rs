//! `::: type title` ... `:::` custom blocks.
//!
//! The body stays structured Markdown: the wrapper is emitted as two raw
//! HTML boundary nodes around the original block nodes.

use crate::code_group::rewrite_code_groups;
use crate::directives::{
    DirectiveOpening, html, is_blank, paragraph, split_at_closer, split_opener,
};
use crate::error::{ParseWarning, SourceLocation};
use crate::parse::DocumentState;
use html_escape::encode_text;
use markdown::mdast::Node;
use std::collections::VecDeque;

const CLOSE: &str = "</div>";

/// Replaces container spans among the root's children.
pub fn transform_containers(root: &mut Node, state: &mut DocumentState) {
    if let Node::Root(root) = root {
        let children = std::mem::take(&mut root.children);
        root.children = rewrite_containers(children, state);
    }
}

fn rewrite_containers(blocks: Vec<Node>, state: &mut DocumentState) -> Vec<Node> {
    let mut queue: VecDeque<Node> = blocks.into();
    let mut output = Vec::with_capacity(queue.len());

    while let Some(node) = queue.pop_front() {
        let Some((opening, rest)) = container_opener(&node) else {
            output.push(node);
            continue;
        };

        if let Some((body, after)) = split_at_closer(&rest) {
            output.push(open(&opening));
            if !is_blank(&body) {
                output.push(paragraph(body));
            }
            output.push(html(CLOSE));
            if !is_blank(&after) {
                queue.push_front(paragraph(after));
            }
            continue;
        }

        let Some(closer) = find_closer(&queue) else {
            state
                .diagnostics
                .add_warning(ParseWarning::UnterminatedDirective {
                    location: SourceLocation::of_node(&node),
                    directive: opening.kind.clone(),
                });
            output.push(node);
            continue;
        };

        let mut body = Vec::new();
        if !is_blank(&rest) {
            body.push(paragraph(rest));
        }
        body.extend(queue.drain(..closer));
        if let Some(Node::Paragraph(closing)) = queue.pop_front()
            && let Some((before, after)) = split_at_closer(&closing.children)
        {
            if !is_blank(&before) {
                body.push(paragraph(before));
            }
            if !is_blank(&after) {
                queue.push_front(paragraph(after));
            }
        }

        let body = rewrite_code_groups(body, state);
        output.push(open(&opening));
        output.extend(rewrite_containers(body, state));
        output.push(html(CLOSE));
    }

    output
}

fn container_opener(node: &Node) -> Option<(DirectiveOpening, Vec<Node>)> {
    let Node::Paragraph(paragraph) = node else {
        return None;
    };
    split_opener(&paragraph.children).filter(|(opening, _)| opening.kind != "code-group")
}

/// Index of the paragraph holding the matching closer.
///
/// Openers met on the way that are not closed inside their own paragraph
/// claim the next closer, so nested containers pair correctly.
fn find_closer(queue: &VecDeque<Node>) -> Option<usize> {
    let mut depth = 0usize;
    for (index, node) in queue.iter().enumerate() {
        let Node::Paragraph(paragraph) = node else {
            continue;
        };
        if let Some((_, rest)) = split_opener(&paragraph.children) {
            if split_at_closer(&rest).is_none() {
                depth += 1;
            }
            continue;
        }
        if split_at_closer(&paragraph.children).is_some() {
            if depth == 0 {
                return Some(index);
            }
            depth -= 1;
        }
    }
    None
}

fn open(opening: &DirectiveOpening) -> Node {
    html(format!(
        "<div class=\"custom-block custom-block-{}\">\n<p class=\"custom-block-title\">{}</p>",
        opening.kind,
        encode_text(&opening.display_title())
    ))
}
