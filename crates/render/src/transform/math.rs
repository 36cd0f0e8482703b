//! TeX math containers for client-side KaTeX.

use super::StageContext;
use crate::renderer::{Element, HtmlNode, rewrite_elements};

/// Turns `language-math` code into `div.math-display` and `span.math-inline`.
///
/// Does nothing when math is disabled.
pub fn render_math(nodes: &mut [HtmlNode], ctx: &StageContext<'_>) {
    if !ctx.options.math {
        return;
    }
    rewrite_elements(nodes, &mut |element: Element| {
        if element.tag == "code" && element.has_class("math-inline") {
            return math_element("span", "math math-inline", &element);
        }
        if element.tag == "pre"
            && let Some(code) = element.child_element("code")
            && code.has_class("math-display")
        {
            return math_element("div", "math math-display", code);
        }
        element.into()
    });
}

fn math_element(tag: &str, class: &str, source: &Element) -> HtmlNode {
    Element::new(tag)
        .with_attribute("class", class)
        .with_children(vec![HtmlNode::Text(source.text_content())])
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::RenderOptions;
    use crate::renderer::to_html;
    use crate::transform::test_support::{convert, run_stage, run_stage_with};

    #[test]
    fn display_and_inline_math() {
        let nodes = run_stage(render_math, convert("$$\n\\frac{a}{b}\n$$\n\nWhere $a < b$."));
        assert_eq!(
            to_html(&nodes),
            "<div class=\"math math-display\">\\frac{a}{b}</div><p>Where <span class=\"math math-inline\">a &lt; b</span>.</p>"
        );
    }

    #[test]
    fn disabled_math_is_left_alone() {
        let options = RenderOptions {
            math: false,
            ..RenderOptions::default()
        };
        let nodes = run_stage_with(render_math, convert("$$\nx\n$$"), options);
        assert_eq!(
            to_html(&nodes),
            "<pre><code class=\"language-math math-display\">x</code></pre>"
        );
    }
}
