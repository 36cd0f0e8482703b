//! Copy buttons on code blocks.

use super::StageContext;
use crate::renderer::{Element, HtmlNode, rewrite_elements};

/// Wraps each `<pre><code>` block in `div.code-block-wrapper` with a copy button.
///
/// Does nothing unless copy buttons are enabled.
pub fn add_copy_buttons(nodes: &mut [HtmlNode], ctx: &StageContext<'_>) {
    if !ctx.options.copy_code {
        return;
    }
    rewrite_elements(nodes, &mut |element: Element| {
        if element.tag != "pre" || element.child_element("code").is_none() {
            return element.into();
        }
        Element::new("div")
            .with_attribute("class", "code-block-wrapper")
            .with_children(vec![element.into(), copy_button().into()])
            .into()
    });
}

fn copy_button() -> Element {
    let icon = Element::new("iconify-icon")
        .with_attribute("icon", "ph:copy")
        .with_attribute("width", "18")
        .with_attribute("height", "18");
    Element::new("button")
        .with_attribute("class", "code-copy-btn")
        .with_attribute("type", "button")
        .with_attribute("aria-label", "Copy code")
        .with_attribute("title", "Copy code")
        .with_children(vec![icon.into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::RenderOptions;
    use crate::renderer::to_html;
    use crate::transform::test_support::{convert, run_stage, run_stage_with};

    #[test]
    fn wraps_code_blocks_when_enabled() {
        let options = RenderOptions {
            copy_code: true,
            ..RenderOptions::default()
        };
        let nodes = run_stage_with(add_copy_buttons, convert("```\nx\n```"), options);
        let html = to_html(&nodes);
        assert!(
            html.starts_with("<div class=\"code-block-wrapper\"><pre><code>x\n</code></pre><button class=\"code-copy-btn\" type=\"button\""),
            "{}",
            html
        );
        assert_eq!(html.matches("code-block-wrapper").count(), 1);
    }

    #[test]
    fn disabled_by_default() {
        let input = "```\nx\n```";
        assert_eq!(run_stage(add_copy_buttons, convert(input)), convert(input));
    }
}
