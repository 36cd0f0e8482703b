//! `::: type title` directive markers inside parsed paragraphs.
//!
//! markdown-rs has no notion of container directives, so `::: tip` and the
//! closing `:::` reach the AST as ordinary paragraph text. The helpers here
//! find those marker lines inside a paragraph's inline children and split
//! the children around them without flattening emphasis, links or code.

use markdown::mdast::{Html, Node, Paragraph, Text};
use once_cell::sync::Lazy;
use regex::Regex;

static OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:::\s*([A-Za-z0-9_][A-Za-z0-9_-]*)(?:\s+(.*))?$").expect("valid opener regex")
});

/// Parsed `::: type title` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveOpening {
    /// Directive type token (`tip`, `warning`, `code-group`, ...).
    pub kind: String,
    /// Title text after the type, if any.
    pub title: Option<String>,
}

impl DirectiveOpening {
    /// Explicit title, or the type with its first letter capitalized.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => capitalize(&self.kind),
        }
    }
}

/// Parses a single line as a directive opener.
///
/// ```
/// use leaf_core::directives::parse_opening_line;
///
/// let opening = parse_opening_line("::: warning Read this first").unwrap();
/// assert_eq!(opening.kind, "warning");
/// assert_eq!(opening.title.as_deref(), Some("Read this first"));
/// assert!(parse_opening_line(":::").is_none());
/// ```
pub fn parse_opening_line(line: &str) -> Option<DirectiveOpening> {
    let captures = OPENER.captures(line.trim_end())?;
    let kind = captures.get(1)?.as_str().to_string();
    let title = captures
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string);
    Some(DirectiveOpening { kind, title })
}

/// Returns true if the line closes a directive.
pub fn is_closer_line(line: &str) -> bool {
    line.trim() == ":::"
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits the opener line off a paragraph's inline children.
///
/// The opener is everything up to the first line ending, read as plain
/// text, so a title may carry emphasis, links or code. Returns the parsed
/// opener and the inline content that followed it.
pub(crate) fn split_opener(inline: &[Node]) -> Option<(DirectiveOpening, Vec<Node>)> {
    match inline.first() {
        Some(Node::Text(first)) if first.value.starts_with(":::") => {}
        _ => return None,
    }

    let mut line = String::new();
    let mut rest = Vec::new();
    let mut next = inline.len();
    for (index, node) in inline.iter().enumerate() {
        match node {
            Node::Break(_) => {
                next = index + 1;
                break;
            }
            Node::Text(text) => match text.value.split_once('\n') {
                Some((head, tail)) => {
                    line.push_str(head);
                    push_text(&mut rest, tail);
                    next = index + 1;
                    break;
                }
                None => line.push_str(&text.value),
            },
            other => line.push_str(&other.to_string()),
        }
    }

    let opening = parse_opening_line(&line)?;
    rest.extend(inline[next..].iter().cloned());
    Some((opening, rest))
}

/// Finds the first closer line in a run of inline nodes.
///
/// Returns the content before the closer and the content after it, with the
/// line breaks around the closer removed.
pub(crate) fn split_at_closer(inline: &[Node]) -> Option<(Vec<Node>, Vec<Node>)> {
    for (index, node) in inline.iter().enumerate() {
        let Node::Text(text) = node else {
            continue;
        };
        let value = text.value.as_str();
        let starts_line = index == 0 || matches!(inline[index - 1], Node::Break(_));
        let next_is_break = matches!(inline.get(index + 1), Some(Node::Break(_)));
        let ends_line = index + 1 == inline.len() || next_is_break;

        let mut starts: Vec<usize> = value.match_indices('\n').map(|(i, _)| i + 1).collect();
        if starts_line {
            starts.insert(0, 0);
        }

        for start in starts {
            let end = value[start..]
                .find('\n')
                .map(|offset| start + offset)
                .unwrap_or(value.len());
            if !is_closer_line(&value[start..end]) || (end == value.len() && !ends_line) {
                continue;
            }

            let mut before = inline[..index].to_vec();
            if start == 0 && matches!(before.last(), Some(Node::Break(_))) {
                before.pop();
            }
            let head = &value[..start];
            push_text(&mut before, head.strip_suffix('\n').unwrap_or(head));

            let mut after = Vec::new();
            let mut skip = index + 1;
            if end < value.len() {
                push_text(&mut after, &value[end + 1..]);
            } else if next_is_break {
                skip += 1;
            }
            after.extend(inline[skip..].iter().cloned());
            return Some((before, after));
        }
    }
    None
}

/// Returns true when the inline nodes render to nothing but whitespace.
pub(crate) fn is_blank(inline: &[Node]) -> bool {
    inline.iter().all(|node| match node {
        Node::Text(text) => text.value.trim().is_empty(),
        Node::Break(_) => true,
        _ => false,
    })
}

fn push_text(nodes: &mut Vec<Node>, value: &str) {
    if !value.is_empty() {
        nodes.push(Node::Text(Text {
            value: value.to_string(),
            position: None,
        }));
    }
}

/// Builds a synthesized paragraph node.
pub(crate) fn paragraph(children: Vec<Node>) -> Node {
    Node::Paragraph(Paragraph {
        children,
        position: None,
    })
}

/// Builds a synthesized raw HTML node.
pub(crate) fn html(value: impl Into<String>) -> Node {
    Node::Html(Html {
        value: value.into(),
        position: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseOptions, parse_mdast};

    fn first_paragraph(input: &str) -> Vec<Node> {
        let root = parse_mdast(input, &ParseOptions::default()).expect("parse");
        match &root.children().expect("children")[0] {
            Node::Paragraph(paragraph) => paragraph.children.clone(),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    fn text_of(nodes: &[Node]) -> String {
        nodes.iter().map(|node| node.to_string()).collect()
    }

    #[test]
    fn parse_opening_lines() {
        let cases: Vec<(&str, Option<(&str, Option<&str>)>)> = vec![
            ("::: tip", Some(("tip", None))),
            (":::tip", Some(("tip", None))),
            ("::: danger  Stop here ", Some(("danger", Some("Stop here")))),
            ("::: code-group", Some(("code-group", None))),
            ("::: details Click to expand", Some(("details", Some("Click to expand")))),
            (":::", None),
            (":::: tip", None),
            ("::: !tip", None),
            ("text ::: tip", None),
        ];

        for (line, expected) in cases {
            let actual = parse_opening_line(line);
            let actual = actual
                .as_ref()
                .map(|opening| (opening.kind.as_str(), opening.title.as_deref()));
            assert_eq!(actual, expected, "line {:?}", line);
        }
    }

    #[test]
    fn display_title_falls_back_to_capitalized_type() {
        let opening = parse_opening_line("::: warning").unwrap();
        assert_eq!(opening.display_title(), "Warning");
        let titled = parse_opening_line("::: warning Heads up").unwrap();
        assert_eq!(titled.display_title(), "Heads up");
    }

    #[test]
    fn closer_lines() {
        assert!(is_closer_line(":::"));
        assert!(is_closer_line("  :::  "));
        assert!(!is_closer_line("::: tip"));
        assert!(!is_closer_line("::::"));
    }

    #[test]
    fn split_opener_keeps_inline_formatting() {
        let inline = first_paragraph("::: tip\nUse **bold** here");
        let (opening, rest) = split_opener(&inline).expect("opener");
        assert_eq!(opening.kind, "tip");
        assert!(matches!(rest[1], Node::Strong(_)), "{rest:?}");
        assert_eq!(text_of(&rest), "Use bold here");
    }

    #[test]
    fn opener_title_may_contain_markup() {
        let inline = first_paragraph("::: details Click *here*\nBody `x`");
        let (opening, rest) = split_opener(&inline).expect("opener");
        assert_eq!(opening.kind, "details");
        assert_eq!(opening.title.as_deref(), Some("Click here"));
        assert!(matches!(rest[1], Node::InlineCode(_)), "{rest:?}");
        assert_eq!(text_of(&rest), "Body x");

        let inline = first_paragraph("::: tip Use `npm` *now*\\\nNext");
        let (opening, rest) = split_opener(&inline).expect("opener");
        assert_eq!(opening.title.as_deref(), Some("Use npm now"));
        assert_eq!(text_of(&rest), "Next");
    }

    #[test]
    fn split_opener_requires_opener_on_first_line() {
        let inline = first_paragraph("Intro\n::: tip");
        assert!(split_opener(&inline).is_none());
    }

    #[test]
    fn split_at_closer_divides_paragraph() {
        let inline = first_paragraph("one *two*\n:::\nthree");
        let (before, after) = split_at_closer(&inline).expect("closer");
        assert_eq!(text_of(&before), "one two");
        assert_eq!(text_of(&after), "three");
    }

    #[test]
    fn closer_must_fill_its_line() {
        let inline = first_paragraph("one\n::: *not a closer*");
        assert!(split_at_closer(&inline).is_none());
    }

    #[test]
    fn blank_detection() {
        assert!(!is_blank(&first_paragraph(":::")));
        assert!(!is_blank(&first_paragraph("*x*")));
        assert!(is_blank(&[]));
    }
}
