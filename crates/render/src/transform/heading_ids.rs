//! Heading `id` attributes.

use super::StageContext;
use crate::renderer::{HtmlNode, walk_elements_mut};
use leaf_core::slugify;

/// Gives every heading without an `id` the slug of its direct text.
///
/// Uses the same text rule and slug function as the TOC extractor, so
/// each TOC entry has a matching anchor. Headings with an empty slug
/// are left without an id.
pub fn assign_heading_ids(nodes: &mut [HtmlNode], _ctx: &StageContext<'_>) {
    walk_elements_mut(nodes, &mut |element| {
        if !element.is_heading() || element.attribute("id").is_some() {
            return;
        }
        let id = slugify(&element.direct_text());
        if !id.is_empty() {
            element.set_attribute("id", id);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Element, to_html};
    use crate::transform::test_support::run_stage;

    #[test]
    fn assigns_slugs_from_direct_text() {
        let nodes = vec![
            Element::new("h2")
                .with_children(vec![HtmlNode::text("Getting Started")])
                .into(),
            Element::new("h3")
                .with_children(vec![
                    HtmlNode::text("Use "),
                    Element::new("code")
                        .with_children(vec![HtmlNode::text("leaf")])
                        .into(),
                ])
                .into(),
        ];
        let nodes = run_stage(assign_heading_ids, nodes);
        assert_eq!(
            to_html(&nodes),
            "<h2 id=\"getting-started\">Getting Started</h2><h3 id=\"use-\">Use <code>leaf</code></h3>"
        );
    }

    #[test]
    fn keeps_existing_ids_and_skips_empty_slugs() {
        let nodes = vec![
            Element::new("h2")
                .with_attribute("id", "custom")
                .with_children(vec![HtmlNode::text("Other")])
                .into(),
            Element::new("h2")
                .with_children(vec![HtmlNode::text("???")])
                .into(),
        ];
        let nodes = run_stage(assign_heading_ids, nodes);
        assert_eq!(
            to_html(&nodes),
            "<h2 id=\"custom\">Other</h2><h2>???</h2>"
        );
    }
}
