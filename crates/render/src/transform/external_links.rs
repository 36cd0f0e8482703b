//! External link decoration.

use super::StageContext;
use crate::renderer::{Element, HtmlNode, walk_elements_mut};

/// Returns true for `http://` and `https://` URLs.
pub fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// Opens external links in a new tab and appends an icon.
pub fn decorate_external_links(nodes: &mut [HtmlNode], _ctx: &StageContext<'_>) {
    walk_elements_mut(nodes, &mut |element| {
        if element.tag != "a" || !element.attribute("href").is_some_and(is_external) {
            return;
        }
        element.add_class("external-link");
        element.set_attribute("target", "_blank");
        element.set_attribute("rel", "noopener noreferrer");
        element.children.push(HtmlNode::text("\u{a0}"));
        element.children.push(external_icon().into());
    });
}

fn external_icon() -> Element {
    let path = Element::new("path").with_attribute(
        "d",
        "M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6",
    );
    let polyline = Element::new("polyline").with_attribute("points", "15 3 21 3 21 9");
    let line = Element::new("line")
        .with_attribute("x1", "10")
        .with_attribute("y1", "14")
        .with_attribute("x2", "21")
        .with_attribute("y2", "3");

    Element::new("svg")
        .with_attribute("class", "external-link-icon")
        .with_attribute("xmlns", "http://www.w3.org/2000/svg")
        .with_attribute("width", "16")
        .with_attribute("height", "16")
        .with_attribute("viewBox", "0 0 24 24")
        .with_attribute("fill", "none")
        .with_attribute("stroke", "currentColor")
        .with_attribute("stroke-width", "2")
        .with_attribute("stroke-linecap", "round")
        .with_attribute("stroke-linejoin", "round")
        .with_children(vec![path.into(), polyline.into(), line.into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::to_html;
    use crate::transform::test_support::{convert, run_stage};

    #[test]
    fn external_detection() {
        let cases = [
            ("https://example.com", true),
            ("http://example.com/a", true),
            ("/guide/", false),
            ("#install", false),
            ("mailto:me@example.com", false),
            ("//cdn.example.com", false),
        ];
        for (href, expected) in cases {
            assert_eq!(is_external(href), expected, "href {:?}", href);
        }
    }

    #[test]
    fn decorates_external_links_only() {
        let nodes = run_stage(
            decorate_external_links,
            convert("[Site](https://example.com) and [Guide](/guide/)"),
        );
        let html = to_html(&nodes);
        assert!(
            html.contains("<a href=\"https://example.com\" class=\"external-link\" target=\"_blank\" rel=\"noopener noreferrer\">Site\u{a0}<svg class=\"external-link-icon\""),
            "{}",
            html
        );
        assert!(html.contains("<a href=\"/guide/\">Guide</a>"), "{}", html);
        assert_eq!(html.matches("<svg").count(), 1);
    }
}
