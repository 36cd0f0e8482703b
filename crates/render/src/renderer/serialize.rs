//! HTML tree to string.

use super::hast::{Element, HtmlNode};
use html_escape::{encode_double_quoted_attribute, encode_text};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Attributes written without a value when their value is empty.
const BARE_ATTRIBUTES: &[&str] = &[
    "checked",
    "disabled",
    "hidden",
    "data-footnote-ref",
    "data-footnote-backref",
    "data-footnotes",
];

/// Serializes a node list.
pub fn to_html(nodes: &[HtmlNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Text(text) => out.push_str(&encode_text(text)),
        HtmlNode::Raw(raw) => out.push_str(raw),
        HtmlNode::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        if value.is_empty() && BARE_ATTRIBUTES.contains(&name.as_str()) {
            continue;
        }
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(value));
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let link = Element::new("a")
            .with_attribute("href", "/search?q=\"a\"&b")
            .with_children(vec![HtmlNode::text("1 < 2 & 3")]);
        assert_eq!(
            to_html(&[link.into()]),
            "<a href=\"/search?q=&quot;a&quot;&amp;b\">1 &lt; 2 &amp; 3</a>"
        );
    }

    #[test]
    fn raw_nodes_are_verbatim() {
        let nodes = vec![
            HtmlNode::Raw("<div class=\"custom-block\">".into()),
            HtmlNode::text("<b>"),
            HtmlNode::Raw("</div>".into()),
        ];
        assert_eq!(to_html(&nodes), "<div class=\"custom-block\">&lt;b&gt;</div>");
    }

    #[test]
    fn void_and_bare_attributes() {
        let input = Element::new("input")
            .with_attribute("type", "checkbox")
            .with_attribute("disabled", "")
            .with_attribute("checked", "");
        let image = Element::new("img").with_attribute("alt", "");
        assert_eq!(
            to_html(&[input.into(), image.into()]),
            "<input type=\"checkbox\" disabled checked /><img alt=\"\" />"
        );
    }
}
