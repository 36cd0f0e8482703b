//! Markdown AST to HTML tree conversion.

use super::hast::{Element, HtmlNode};
use leaf_core::slugify;
use markdown::mdast::{self, AlignKind, Node};
use std::collections::HashMap;

/// Conversion state for one document.
///
/// Definitions and footnote definitions are gathered up front so references
/// can resolve regardless of where the definition appears.
struct Context<'a> {
    definitions: HashMap<&'a str, &'a mdast::Definition>,
    footnote_definitions: HashMap<&'a str, &'a mdast::FootnoteDefinition>,
    /// Footnote identifiers in order of first reference.
    footnote_order: Vec<&'a str>,
    footnote_refs: HashMap<&'a str, usize>,
    tight: Vec<bool>,
}

impl<'a> Context<'a> {
    fn new(root: &'a Node) -> Self {
        let mut ctx = Self {
            definitions: HashMap::new(),
            footnote_definitions: HashMap::new(),
            footnote_order: Vec::new(),
            footnote_refs: HashMap::new(),
            tight: Vec::new(),
        };
        ctx.collect_definitions(root);
        ctx
    }

    fn collect_definitions(&mut self, node: &'a Node) {
        match node {
            Node::Definition(definition) => {
                self.definitions
                    .entry(definition.identifier.as_str())
                    .or_insert(definition);
            }
            Node::FootnoteDefinition(definition) => {
                self.footnote_definitions
                    .entry(definition.identifier.as_str())
                    .or_insert(definition);
            }
            _ => {}
        }
        for child in node.children().into_iter().flatten() {
            self.collect_definitions(child);
        }
    }

    fn in_tight_list(&self) -> bool {
        self.tight.last().copied().unwrap_or(false)
    }

    /// Ordinal of a footnote and how many times it has been referenced so far.
    fn reference_footnote(&mut self, identifier: &'a str) -> (usize, usize) {
        let ordinal = match self.footnote_order.iter().position(|id| *id == identifier) {
            Some(index) => index + 1,
            None => {
                self.footnote_order.push(identifier);
                self.footnote_order.len()
            }
        };
        let count = self.footnote_refs.entry(identifier).or_insert(0);
        *count += 1;
        (ordinal, *count)
    }
}

/// Converts a Markdown AST into an HTML tree.
///
/// Raw HTML nodes become [`HtmlNode::Raw`], fenced code keeps its meta
/// string in a transient `data-meta` attribute, and math is emitted as
/// `language-math` code for the math stage to pick up.
pub fn mdast_to_html(root: &Node) -> Vec<HtmlNode> {
    let mut ctx = Context::new(root);
    let mut nodes = convert_node(root, &mut ctx);
    if let Some(section) = footnote_section(&mut ctx) {
        nodes.push(section.into());
    }
    nodes
}

fn convert_children<'a>(children: &'a [Node], ctx: &mut Context<'a>) -> Vec<HtmlNode> {
    children
        .iter()
        .flat_map(|child| convert_node(child, ctx))
        .collect()
}

fn element<'a>(tag: &str, children: &'a [Node], ctx: &mut Context<'a>) -> Vec<HtmlNode> {
    vec![Element::new(tag).with_children(convert_children(children, ctx)).into()]
}

fn convert_node<'a>(node: &'a Node, ctx: &mut Context<'a>) -> Vec<HtmlNode> {
    match node {
        Node::Root(root) => convert_children(&root.children, ctx),
        Node::Text(text) => vec![HtmlNode::text(text.value.as_str())],
        Node::Paragraph(paragraph) => {
            if ctx.in_tight_list() {
                convert_children(&paragraph.children, ctx)
            } else {
                element("p", &paragraph.children, ctx)
            }
        }
        Node::Heading(heading) => element(&format!("h{}", heading.depth), &heading.children, ctx),
        Node::Emphasis(emphasis) => element("em", &emphasis.children, ctx),
        Node::Strong(strong) => element("strong", &strong.children, ctx),
        Node::Delete(delete) => element("del", &delete.children, ctx),
        Node::InlineCode(code) => vec![
            Element::new("code")
                .with_children(vec![HtmlNode::text(code.value.as_str())])
                .into(),
        ],
        // Raw so the newline never counts as heading text.
        Node::Break(_) => vec![Element::new("br").into(), HtmlNode::Raw("\n".into())],
        Node::ThematicBreak(_) => vec![Element::new("hr").into()],
        Node::Blockquote(quote) => element("blockquote", &quote.children, ctx),
        Node::List(list) => convert_list(list, ctx),
        Node::ListItem(item) => convert_list_item(item, ctx),
        Node::Code(code) => vec![convert_code(code).into()],
        Node::Html(html) => vec![HtmlNode::Raw(html.value.clone())],
        Node::Link(link) => {
            let mut anchor = Element::new("a").with_attribute("href", link.url.as_str());
            if let Some(title) = &link.title {
                anchor.set_attribute("title", title.as_str());
            }
            vec![anchor.with_children(convert_children(&link.children, ctx)).into()]
        }
        Node::Image(image) => vec![image_element(&image.url, &image.alt, image.title.as_deref()).into()],
        Node::LinkReference(reference) => {
            match ctx.definitions.get(reference.identifier.as_str()).copied() {
                Some(definition) => {
                    let mut anchor =
                        Element::new("a").with_attribute("href", definition.url.as_str());
                    if let Some(title) = &definition.title {
                        anchor.set_attribute("title", title.as_str());
                    }
                    vec![anchor.with_children(convert_children(&reference.children, ctx)).into()]
                }
                None => {
                    let mut nodes = vec![HtmlNode::text("[")];
                    nodes.extend(convert_children(&reference.children, ctx));
                    nodes.push(HtmlNode::text("]"));
                    nodes
                }
            }
        }
        Node::ImageReference(reference) => {
            match ctx.definitions.get(reference.identifier.as_str()) {
                Some(definition) => vec![
                    image_element(&definition.url, &reference.alt, definition.title.as_deref())
                        .into(),
                ],
                None => vec![HtmlNode::text(format!("![{}]", reference.alt))],
            }
        }
        Node::Table(table) => vec![convert_table(table, ctx).into()],
        Node::Math(math) => vec![
            Element::new("pre")
                .with_children(vec![
                    Element::new("code")
                        .with_attribute("class", "language-math math-display")
                        .with_children(vec![HtmlNode::text(math.value.as_str())])
                        .into(),
                ])
                .into(),
        ],
        Node::InlineMath(math) => vec![
            Element::new("code")
                .with_attribute("class", "language-math math-inline")
                .with_children(vec![HtmlNode::text(math.value.as_str())])
                .into(),
        ],
        Node::FootnoteReference(reference) => {
            let identifier = reference.identifier.as_str();
            if !ctx.footnote_definitions.contains_key(identifier) {
                let label = reference.label.as_deref().unwrap_or(identifier);
                return vec![HtmlNode::text(format!("[^{}]", label))];
            }
            let (ordinal, count) = ctx.reference_footnote(identifier);
            let safe_id = footnote_id(identifier, ordinal);
            let suffix = if count == 1 {
                String::new()
            } else {
                format!("-{}", count)
            };
            let anchor = Element::new("a")
                .with_attribute("href", format!("#user-content-fn-{}", safe_id))
                .with_attribute("id", format!("user-content-fnref-{}{}", safe_id, suffix))
                .with_attribute("data-footnote-ref", "")
                .with_attribute("aria-describedby", "footnote-label")
                .with_children(vec![HtmlNode::text(ordinal.to_string())]);
            vec![Element::new("sup").with_children(vec![anchor.into()]).into()]
        }
        Node::Definition(_) | Node::FootnoteDefinition(_) | Node::Yaml(_) | Node::Toml(_) => {
            Vec::new()
        }
        Node::TableRow(_) | Node::TableCell(_) => Vec::new(),
        _ => {
            log::warn!("Unhandled markdown node type: {:?}", node);
            Vec::new()
        }
    }
}

fn convert_list<'a>(list: &'a mdast::List, ctx: &mut Context<'a>) -> Vec<HtmlNode> {
    let loose = list.spread
        || list
            .children
            .iter()
            .any(|child| matches!(child, Node::ListItem(item) if item.spread));
    let mut element = Element::new(if list.ordered { "ol" } else { "ul" });
    if list.ordered
        && let Some(start) = list.start
        && start != 1
    {
        element.set_attribute("start", start.to_string());
    }
    if list
        .children
        .iter()
        .any(|child| matches!(child, Node::ListItem(item) if item.checked.is_some()))
    {
        element.add_class("contains-task-list");
    }

    ctx.tight.push(!loose);
    let children = convert_children(&list.children, ctx);
    ctx.tight.pop();
    vec![element.with_children(children).into()]
}

fn convert_list_item<'a>(item: &'a mdast::ListItem, ctx: &mut Context<'a>) -> Vec<HtmlNode> {
    let mut children = convert_children(&item.children, ctx);
    let mut li = Element::new("li");

    if let Some(checked) = item.checked {
        li.add_class("task-list-item");
        let mut input = Element::new("input")
            .with_attribute("type", "checkbox")
            .with_attribute("disabled", "");
        if checked {
            input.set_attribute("checked", "");
        }
        let marker = [HtmlNode::from(input), HtmlNode::text(" ")];
        match children.first_mut().and_then(HtmlNode::as_element_mut) {
            Some(paragraph) if paragraph.tag == "p" => {
                paragraph.children.splice(0..0, marker);
            }
            _ => {
                children.splice(0..0, marker);
            }
        }
    }

    vec![li.with_children(children).into()]
}

fn convert_code(code: &mdast::Code) -> Element {
    let mut inner = Element::new("code");
    if let Some(lang) = code.lang.as_deref().filter(|lang| !lang.is_empty()) {
        inner.set_attribute("class", format!("language-{}", lang));
    }
    if let Some(meta) = code.meta.as_deref().filter(|meta| !meta.trim().is_empty()) {
        inner.set_attribute("data-meta", meta);
    }
    let mut value = code.value.clone();
    if !value.is_empty() {
        value.push('\n');
    }
    inner.children.push(HtmlNode::Text(value));
    Element::new("pre").with_children(vec![inner.into()])
}

fn image_element(url: &str, alt: &str, title: Option<&str>) -> Element {
    let mut image = Element::new("img")
        .with_attribute("src", url)
        .with_attribute("alt", alt);
    if let Some(title) = title {
        image.set_attribute("title", title);
    }
    image
}

fn convert_table<'a>(table: &'a mdast::Table, ctx: &mut Context<'a>) -> Element {
    let mut rows = table.children.iter().filter_map(|row| match row {
        Node::TableRow(row) => Some(row),
        _ => None,
    });

    let mut children = Vec::new();
    if let Some(header) = rows.next() {
        let row = convert_row(header, "th", &table.align, ctx);
        children.push(Element::new("thead").with_children(vec![row.into()]).into());
    }
    let body: Vec<HtmlNode> = rows
        .map(|row| convert_row(row, "td", &table.align, ctx).into())
        .collect();
    if !body.is_empty() {
        children.push(Element::new("tbody").with_children(body).into());
    }
    Element::new("table").with_children(children)
}

fn convert_row<'a>(
    row: &'a mdast::TableRow,
    tag: &str,
    aligns: &[AlignKind],
    ctx: &mut Context<'a>,
) -> Element {
    let cells = row
        .children
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| match cell {
            Node::TableCell(cell) => Some((index, cell)),
            _ => None,
        })
        .map(|(index, cell)| {
            let mut element = Element::new(tag);
            match aligns.get(index) {
                Some(AlignKind::Left) => element.set_attribute("align", "left"),
                Some(AlignKind::Right) => element.set_attribute("align", "right"),
                Some(AlignKind::Center) => element.set_attribute("align", "center"),
                Some(AlignKind::None) | None => {}
            }
            element.with_children(convert_children(&cell.children, ctx)).into()
        })
        .collect();
    Element::new("tr").with_children(cells)
}

fn footnote_id(identifier: &str, ordinal: usize) -> String {
    let slug = slugify(identifier);
    if slug.is_empty() { ordinal.to_string() } else { slug }
}

/// The trailing footnotes section, definitions in order of first reference.
fn footnote_section<'a>(ctx: &mut Context<'a>) -> Option<Element> {
    if ctx.footnote_order.is_empty() {
        return None;
    }

    let mut items = Vec::new();
    let mut index = 0;
    // Definitions may reference further footnotes, which extends the order.
    while let Some(identifier) = ctx.footnote_order.get(index).copied() {
        index += 1;
        let Some(definition) = ctx.footnote_definitions.get(identifier).copied() else {
            continue;
        };
        let safe_id = footnote_id(identifier, index);
        let mut children = convert_children(&definition.children, ctx);

        let references = ctx.footnote_refs.get(identifier).copied().unwrap_or(1);
        let mut backrefs = Vec::new();
        for count in 1..=references {
            let suffix = if count == 1 {
                String::new()
            } else {
                format!("-{}", count)
            };
            backrefs.push(HtmlNode::text(" "));
            backrefs.push(
                Element::new("a")
                    .with_attribute("href", format!("#user-content-fnref-{}{}", safe_id, suffix))
                    .with_attribute("data-footnote-backref", "")
                    .with_attribute("class", "data-footnote-backref")
                    .with_attribute("aria-label", format!("Back to reference {}", index))
                    .with_children(vec![HtmlNode::text("↩")])
                    .into(),
            );
        }
        match children.last_mut().and_then(HtmlNode::as_element_mut) {
            Some(paragraph) if paragraph.tag == "p" => paragraph.children.extend(backrefs),
            _ => children.extend(backrefs),
        }

        items.push(
            Element::new("li")
                .with_attribute("id", format!("user-content-fn-{}", safe_id))
                .with_children(children)
                .into(),
        );
    }

    let label = Element::new("h2")
        .with_attribute("class", "sr-only")
        .with_attribute("id", "footnote-label")
        .with_children(vec![HtmlNode::text("Footnotes")]);
    Some(
        Element::new("section")
            .with_attribute("data-footnotes", "")
            .with_attribute("class", "footnotes")
            .with_children(vec![
                label.into(),
                Element::new("ol").with_children(items).into(),
            ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::serialize::to_html;
    use leaf_core::{ParseOptions, parse_mdast};

    fn render(input: &str) -> String {
        let root = parse_mdast(input, &ParseOptions::default()).expect("parse");
        to_html(&mdast_to_html(&root))
    }

    #[test]
    fn block_mapping() {
        let cases: Vec<(&str, &str)> = vec![
            ("# Title", "<h1>Title</h1>"),
            ("Some *em* and **strong** and ~~gone~~", "<p>Some <em>em</em> and <strong>strong</strong> and <del>gone</del></p>"),
            ("`a < b`", "<p><code>a &lt; b</code></p>"),
            ("> quoted", "<blockquote><p>quoted</p></blockquote>"),
            ("---", "<hr />"),
            ("[Leaf](/guide/ \"Guide\")", "<p><a href=\"/guide/\" title=\"Guide\">Leaf</a></p>"),
            ("![logo](/logo.svg)", "<p><img src=\"/logo.svg\" alt=\"logo\" /></p>"),
            ("<div class=\"raw\">kept</div>", "<div class=\"raw\">kept</div>"),
            ("3. three\n4. four", "<ol start=\"3\"><li>three</li><li>four</li></ol>"),
        ];
        for (input, expected) in cases {
            assert_eq!(render(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn tight_and_loose_lists() {
        assert_eq!(render("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(
            render("- a\n\n- b"),
            "<ul><li><p>a</p></li><li><p>b</p></li></ul>"
        );
    }

    #[test]
    fn task_list_items() {
        let html = render("- [x] done\n- [ ] todo");
        assert!(html.contains("<ul class=\"contains-task-list\">"), "{}", html);
        assert!(
            html.contains("<li class=\"task-list-item\"><input type=\"checkbox\" disabled checked /> done</li>"),
            "{}",
            html
        );
        assert!(
            html.contains("<li class=\"task-list-item\"><input type=\"checkbox\" disabled /> todo</li>"),
            "{}",
            html
        );
    }

    #[test]
    fn code_keeps_language_and_meta() {
        let html = render("```js {2}\nconst a = 1;\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-js\" data-meta=\"{2}\">const a = 1;\n</code></pre>"
        );
        assert_eq!(render("```\n```"), "<pre><code></code></pre>");
    }

    #[test]
    fn tables_with_alignment() {
        let html = render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            html,
            "<table><thead><tr><th align=\"left\">a</th><th align=\"right\">b</th></tr></thead><tbody><tr><td align=\"left\">1</td><td align=\"right\">2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn reference_links_resolve() {
        let html = render("See [the docs][docs].\n\n[docs]: https://example.com \"Docs\"");
        assert_eq!(
            html,
            "<p>See <a href=\"https://example.com\" title=\"Docs\">the docs</a>.</p>"
        );
    }

    #[test]
    fn math_is_marked_for_the_math_stage() {
        let html = render("$$\nx^2\n$$\n\nInline $y$.");
        assert!(
            html.contains("<pre><code class=\"language-math math-display\">x^2</code></pre>"),
            "{}",
            html
        );
        assert!(
            html.contains("<code class=\"language-math math-inline\">y</code>"),
            "{}",
            html
        );
    }

    #[test]
    fn footnotes_collect_into_a_section() {
        let html = render("Claim[^1] and again[^1].\n\n[^1]: Source.");
        assert!(
            html.contains("<sup><a href=\"#user-content-fn-1\" id=\"user-content-fnref-1\" data-footnote-ref aria-describedby=\"footnote-label\">1</a></sup>"),
            "{}",
            html
        );
        assert!(html.contains("id=\"user-content-fnref-1-2\""), "{}", html);
        assert!(html.contains("<section data-footnotes class=\"footnotes\">"), "{}", html);
        assert!(html.contains("<li id=\"user-content-fn-1\"><p>Source."), "{}", html);
        assert!(html.contains("href=\"#user-content-fnref-1-2\""), "{}", html);
    }
}
