//! `::: code-group` spans of fenced code rendered as a tabbed group.

use crate::directives::{html, is_blank, paragraph, split_at_closer, split_opener};
use crate::error::{ParseWarning, SourceLocation};
use crate::parse::DocumentState;
use html_escape::{encode_double_quoted_attribute, encode_text};
use markdown::mdast::{Code, Node};
use serde::Serialize;
use std::collections::VecDeque;

const CODE_GROUP: &str = "code-group";

/// One tab of a code group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeGroupTab {
    /// Text shown on the tab.
    pub label: String,
    /// Fence language token, `text` when absent.
    pub language: String,
    /// Code shown in the tab.
    pub code: String,
}

impl CodeGroupTab {
    /// Derives a tab from a fenced code node.
    pub fn from_code(code: &Code) -> Self {
        let language = code
            .lang
            .clone()
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| "text".to_string());
        let label = code
            .meta
            .as_deref()
            .and_then(label_from_meta)
            .unwrap_or_else(|| language.clone());
        Self {
            label,
            language,
            code: code.value.clone(),
        }
    }
}

/// Reads a tab label from a fence meta string.
///
/// `[config.js]` wins; otherwise whatever remains after removing a
/// `{1,3-4}` line-highlight range list.
pub fn label_from_meta(meta: &str) -> Option<String> {
    if let Some(open) = meta.find('[')
        && let Some(len) = meta[open + 1..].find(']')
    {
        let label = meta[open + 1..open + 1 + len].trim();
        if !label.is_empty() {
            return Some(label.to_string());
        }
    }

    let mut rest = String::with_capacity(meta.len());
    let mut depth = 0usize;
    for ch in meta.chars() {
        match ch {
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            _ if depth == 0 => rest.push(ch),
            _ => {}
        }
    }
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Replaces top-level code-group spans with tab markup.
pub fn transform_code_groups(root: &mut Node, state: &mut DocumentState) {
    if let Node::Root(root) = root {
        let children = std::mem::take(&mut root.children);
        root.children = rewrite_code_groups(children, state);
    }
}

/// Rewrites code groups in a block sequence.
pub(crate) fn rewrite_code_groups(blocks: Vec<Node>, state: &mut DocumentState) -> Vec<Node> {
    let mut queue: VecDeque<Node> = blocks.into();
    let mut output = Vec::with_capacity(queue.len());

    while let Some(node) = queue.pop_front() {
        let Some(rest) = code_group_opener(&node) else {
            output.push(node);
            continue;
        };

        // "::: code-group\n:::" in a single paragraph: nothing to render.
        if split_at_closer(&rest).is_some_and(|(before, after)| before.is_empty() && after.is_empty()) {
            continue;
        }
        if !rest.is_empty() {
            state.diagnostics.add_warning(ParseWarning::MalformedCodeGroup {
                location: SourceLocation::of_node(&node),
                found: "text on the opener line".to_string(),
            });
            output.push(node);
            continue;
        }

        match scan_fences(&queue) {
            Scan::Closed(count) => {
                let fences: Vec<Node> = queue.drain(..count).collect();
                if let Some(Node::Paragraph(closing)) = queue.pop_front()
                    && let Some((_, after)) = split_at_closer(&closing.children)
                    && !is_blank(&after)
                {
                    queue.push_front(paragraph(after));
                }
                output.extend(render_group(fences));
            }
            Scan::Malformed(found) => {
                state.diagnostics.add_warning(ParseWarning::MalformedCodeGroup {
                    location: SourceLocation::of_node(&node),
                    found,
                });
                output.push(node);
            }
            Scan::Unterminated => {
                state.diagnostics.add_warning(ParseWarning::UnterminatedDirective {
                    location: SourceLocation::of_node(&node),
                    directive: CODE_GROUP.to_string(),
                });
                output.push(node);
            }
        }
    }

    output
}

fn code_group_opener(node: &Node) -> Option<Vec<Node>> {
    let Node::Paragraph(paragraph) = node else {
        return None;
    };
    let (opening, rest) = split_opener(&paragraph.children)?;
    (opening.kind == CODE_GROUP).then_some(rest)
}

enum Scan {
    Closed(usize),
    Malformed(String),
    Unterminated,
}

fn scan_fences(queue: &VecDeque<Node>) -> Scan {
    for (index, node) in queue.iter().enumerate() {
        match node {
            Node::Code(_) => continue,
            Node::Paragraph(paragraph) if opens_with_closer(&paragraph.children) => {
                return Scan::Closed(index);
            }
            other => return Scan::Malformed(describe(other)),
        }
    }
    Scan::Unterminated
}

/// A closer on the paragraph's first line; later lines are ordinary content.
fn opens_with_closer(inline: &[Node]) -> bool {
    split_at_closer(inline).is_some_and(|(before, _)| is_blank(&before))
}

fn describe(node: &Node) -> String {
    match node {
        Node::Paragraph(_) => "a paragraph".to_string(),
        Node::Heading(_) => "a heading".to_string(),
        Node::List(_) => "a list".to_string(),
        Node::Html(_) => "raw HTML".to_string(),
        _ => "other content".to_string(),
    }
}

fn render_group(fences: Vec<Node>) -> Vec<Node> {
    if fences.is_empty() {
        return Vec::new();
    }

    let tabs: Vec<CodeGroupTab> = fences
        .iter()
        .filter_map(|node| match node {
            Node::Code(code) => Some(CodeGroupTab::from_code(code)),
            _ => None,
        })
        .collect();
    let data = serde_json::to_string(&tabs).unwrap_or_else(|_| "[]".to_string());

    let mut opening = format!(
        "<div class=\"code-group\" data-tabs=\"{}\">\n<div class=\"code-group-tabs\">",
        encode_double_quoted_attribute(&data)
    );
    for (index, tab) in tabs.iter().enumerate() {
        opening.push_str(&format!(
            "<button type=\"button\" class=\"code-group-tab{}\" data-tab=\"{}\">{}</button>",
            active(index),
            index,
            encode_text(&tab.label)
        ));
    }
    opening.push_str("</div>\n<div class=\"code-group-panels\">");

    let mut nodes = vec![html(opening)];
    for (index, fence) in fences.into_iter().enumerate() {
        nodes.push(html(format!(
            "<div class=\"code-group-panel{}\" data-tab=\"{}\">",
            active(index),
            index
        )));
        nodes.push(fence);
        nodes.push(html("</div>"));
    }
    nodes.push(html("</div>\n</div>"));
    nodes
}

fn active(index: usize) -> &'static str {
    if index == 0 { " active" } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseOptions, parse_mdast};

    fn run(input: &str) -> (Vec<Node>, DocumentState) {
        let mut root = parse_mdast(input, &ParseOptions::default()).expect("parse");
        let mut state = DocumentState::default();
        transform_code_groups(&mut root, &mut state);
        let children = root.children().cloned().unwrap_or_default();
        (children, state)
    }

    fn html_values(nodes: &[Node]) -> String {
        nodes
            .iter()
            .filter_map(|node| match node {
                Node::Html(html) => Some(html.value.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn labels_from_meta() {
        let cases: Vec<(&str, Option<&str>)> = vec![
            ("[config.js]", Some("config.js")),
            ("[vite.config.ts] {2}", Some("vite.config.ts")),
            ("npm", Some("npm")),
            ("{1,3-4}", None),
            ("  ", None),
        ];
        for (meta, expected) in cases {
            assert_eq!(label_from_meta(meta).as_deref(), expected, "meta {:?}", meta);
        }
    }

    #[test]
    fn groups_consecutive_fences() {
        let input = "::: code-group\n\n```js [app.js]\nconsole.log(1)\n```\n\n```ts\nlet a: number = 1\n```\n\n:::\n\nAfter";
        let (nodes, state) = run(input);
        assert!(!state.diagnostics.has_warnings());

        let markup = html_values(&nodes);
        assert!(markup.contains("class=\"code-group\""), "{}", markup);
        assert!(
            markup.contains("<button type=\"button\" class=\"code-group-tab active\" data-tab=\"0\">app.js</button>"),
            "{}",
            markup
        );
        assert!(
            markup.contains("<button type=\"button\" class=\"code-group-tab\" data-tab=\"1\">ts</button>"),
            "{}",
            markup
        );
        assert!(markup.contains("&quot;label&quot;:&quot;app.js&quot;"), "{}", markup);

        let fences = nodes.iter().filter(|node| matches!(node, Node::Code(_))).count();
        assert_eq!(fences, 2);
        assert!(matches!(nodes.last(), Some(Node::Paragraph(_))));
    }

    #[test]
    fn fences_directly_under_opener() {
        let input = "::: code-group\n```sh [npm]\nnpm i leaf\n```\n```sh [pnpm]\npnpm add leaf\n```\n:::";
        let (nodes, _) = run(input);
        let markup = html_values(&nodes);
        assert!(markup.contains(">npm</button>"), "{}", markup);
        assert!(markup.contains(">pnpm</button>"), "{}", markup);
        assert!(!markup.contains(":::"));
    }

    #[test]
    fn closer_sharing_a_paragraph_with_text() {
        let (nodes, state) = run("::: code-group\n```js [a.js]\nx\n```\n:::\nAfter *this*");
        assert!(!state.diagnostics.has_warnings(), "{:?}", state.diagnostics);
        assert!(html_values(&nodes).contains("class=\"code-group\""));
        match nodes.last() {
            Some(Node::Paragraph(after)) => {
                assert_eq!(Node::Paragraph(after.clone()).to_string(), "After this");
                assert!(matches!(after.children[1], Node::Emphasis(_)));
            }
            other => panic!("expected trailing paragraph, got {other:?}"),
        }
    }

    #[test]
    fn tab_data_is_valid_json() {
        let tabs = vec![CodeGroupTab {
            label: "a \"quoted\" <tab>".into(),
            language: "html".into(),
            code: "<b>&</b>".into(),
        }];
        let json = serde_json::to_string(&tabs).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded[0]["code"], "<b>&</b>");
    }

    #[test]
    fn empty_group_renders_nothing() {
        let (nodes, state) = run("::: code-group\n\n:::\n\nText");
        assert_eq!(nodes.len(), 1);
        assert!(!state.diagnostics.has_warnings());

        let (nodes, _) = run("::: code-group\n:::");
        assert!(nodes.is_empty(), "{nodes:?}");
    }

    #[test]
    fn unterminated_group_passes_through() {
        let (nodes, state) = run("::: code-group\n\n```js\nx\n```");
        assert!(matches!(nodes[0], Node::Paragraph(_)));
        assert!(matches!(nodes[1], Node::Code(_)));
        assert!(matches!(
            state.diagnostics.warnings[0],
            ParseWarning::UnterminatedDirective { .. }
        ));
    }

    #[test]
    fn prose_inside_group_is_left_alone() {
        let (nodes, state) = run("::: code-group\n\nNot code\n\n:::");
        assert_eq!(nodes.len(), 3);
        assert!(html_values(&nodes).is_empty());
        assert!(matches!(
            state.diagnostics.warnings[0],
            ParseWarning::MalformedCodeGroup { .. }
        ));
    }

    #[test]
    fn other_directives_are_ignored() {
        let (nodes, state) = run("::: tip\nBody\n:::");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0], Node::Paragraph(_)));
        assert!(!state.diagnostics.has_warnings());
    }
}
