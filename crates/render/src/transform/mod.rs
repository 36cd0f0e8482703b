//! HTML-stage post-transforms.
//!
//! - `heading_ids`: slug ids on headings, shared with the TOC.
//! - `math`: TeX containers for client-side KaTeX.
//! - `mermaid`: diagram blocks kept as raw source.
//! - `highlight`: syntect token spans behind the `Highlighter` seam.
//! - `line_highlight`: `{2,4-6}` line markers and line numbers.
//! - `copy_code`: copy buttons around code blocks.
//! - `external_links`: new-tab links with an icon.

/// Copy buttons on code blocks.
pub mod copy_code;
/// External link decoration.
pub mod external_links;
/// Heading ids.
pub mod heading_ids;
/// Syntax highlighting seam.
pub mod highlight;
/// Line highlighting and line numbers.
pub mod line_highlight;
/// Math containers.
pub mod math;
/// Mermaid diagram marking.
pub mod mermaid;

use crate::processor::RenderOptions;
use crate::renderer::HtmlNode;
use highlight::Highlighter;

/// What the built-in stages may consult while rewriting.
pub struct StageContext<'a> {
    /// Per-processor rendering switches.
    pub options: &'a RenderOptions,
    /// Highlighter used by the highlight stage.
    pub highlighter: &'a dyn Highlighter,
}

/// Signature shared by every built-in HTML stage.
pub type HtmlStage = fn(&mut [HtmlNode], &StageContext<'_>);

/// Built-in stages in execution order.
///
/// Mermaid marking precedes highlighting, and line highlighting follows
/// it so the line spans wrap highlighted markup.
pub const STAGES: [(&str, HtmlStage); 7] = [
    ("heading-ids", heading_ids::assign_heading_ids),
    ("math", math::render_math),
    ("mermaid", mermaid::mark_mermaid),
    ("highlight", highlight::highlight_code),
    ("line-highlight", line_highlight::highlight_lines),
    ("copy-code", copy_code::add_copy_buttons),
    ("external-links", external_links::decorate_external_links),
];

/// Runs every built-in stage over the tree.
pub fn run_stages(nodes: &mut [HtmlNode], ctx: &StageContext<'_>) {
    for (name, stage) in STAGES {
        log::trace!("html stage: {}", name);
        stage(nodes, ctx);
    }
}

/// A user-supplied transform run on the HTML tree after the built-in stages.
pub trait HtmlTransform: Send + Sync {
    /// Mutate the HTML tree in place.
    fn transform(&self, nodes: &mut Vec<HtmlNode>);
}

impl<F> HtmlTransform for F
where
    F: Fn(&mut Vec<HtmlNode>) + Send + Sync,
{
    fn transform(&self, nodes: &mut Vec<HtmlNode>) {
        (self)(nodes)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::renderer::mdast_to_html;
    use highlight::SyntectHighlighter;
    use leaf_core::{ParseOptions, parse_mdast};

    pub fn convert(input: &str) -> Vec<HtmlNode> {
        let root = parse_mdast(input, &ParseOptions::default()).expect("parse");
        mdast_to_html(&root)
    }

    pub fn run_stage(stage: HtmlStage, nodes: Vec<HtmlNode>) -> Vec<HtmlNode> {
        run_stage_with(stage, nodes, RenderOptions::default())
    }

    pub fn run_stage_with(
        stage: HtmlStage,
        mut nodes: Vec<HtmlNode>,
        options: RenderOptions,
    ) -> Vec<HtmlNode> {
        let ctx = StageContext {
            options: &options,
            highlighter: &SyntectHighlighter,
        };
        stage(&mut nodes, &ctx);
        nodes
    }
}
