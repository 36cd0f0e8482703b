//! Mermaid diagrams, left for the client to render.

use super::StageContext;
use crate::renderer::{Element, HtmlNode, rewrite_elements};

/// Replaces `<pre><code class="language-mermaid">` with `<div class="mermaid">`.
///
/// Must run before highlighting so the diagram source stays plain text.
pub fn mark_mermaid(nodes: &mut [HtmlNode], _ctx: &StageContext<'_>) {
    rewrite_elements(nodes, &mut |element: Element| {
        if element.tag == "pre"
            && let Some(code) = element.child_element("code")
            && code.language() == Some("mermaid")
        {
            return Element::new("div")
                .with_attribute("class", "mermaid")
                .with_children(vec![HtmlNode::Text(code.direct_text())])
                .into();
        }
        element.into()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::to_html;
    use crate::transform::test_support::{convert, run_stage};

    #[test]
    fn mermaid_fence_becomes_diagram_div() {
        let nodes = run_stage(mark_mermaid, convert("```mermaid\ngraph TD\n  A-->B\n```"));
        assert_eq!(
            to_html(&nodes),
            "<div class=\"mermaid\">graph TD\n  A--&gt;B\n</div>"
        );
    }

    #[test]
    fn other_fences_untouched() {
        let input = "```js\nlet a = 1;\n```";
        assert_eq!(run_stage(mark_mermaid, convert(input)), convert(input));
    }
}
