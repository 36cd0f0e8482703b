//! Syntax highlighting.

use super::StageContext;
use crate::renderer::{Element, HtmlNode, walk_elements_mut};
use html_escape::encode_text;
use once_cell::sync::Lazy;
use std::fmt::Write as FmtWrite;
use syntect::easy::ScopeRegionIterator;
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Scope roots that get a token class, matched innermost scope first.
const TOKEN_SCOPES: [&str; 10] = [
    "comment", "string", "constant", "keyword", "storage", "entity", "support", "variable",
    "invalid", "markup",
];

/// Highlights the `<code>` element of one fenced block in place.
///
/// Implementations may replace the code's children with markup; the
/// line-highlight stage splits text and raw children on newlines, so
/// markup must not leave elements open across a newline.
pub trait Highlighter: Send + Sync {
    /// Highlight `code`, whose fence language is `language`.
    fn highlight(&self, language: Option<&str>, code: &mut Element);
}

/// Default highlighter backed by syntect's bundled grammars.
///
/// Tokens become `<span class="hljs-{scope}">` so highlight.js themes
/// apply. Unknown languages keep their plain text.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntectHighlighter;

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, language: Option<&str>, code: &mut Element) {
        code.add_class("hljs");
        let Some(language) = language else {
            return;
        };
        if let Some(markup) = highlight_to_html(language, &code.text_content()) {
            code.children = vec![HtmlNode::Raw(markup)];
        }
    }
}

/// Tokenizes `source` as `language` into escaped HTML with per-line spans.
///
/// Returns `None` when no grammar matches the language token.
///
/// ```
/// use leaf_render::transform::highlight::highlight_to_html;
///
/// let html = highlight_to_html("js", "const s = \"hi\";\n").unwrap();
/// assert!(html.contains("<span class=\"hljs-string\">\"hi\"</span>"));
/// assert!(highlight_to_html("no-such-language", "x").is_none());
/// ```
pub fn highlight_to_html(language: &str, source: &str) -> Option<String> {
    let syntax = SYNTAXES.find_syntax_by_token(language)?;
    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut html = String::with_capacity(source.len() * 2);

    for line in LinesWithEndings::from(source) {
        let ops = match state.parse_line(line, &SYNTAXES) {
            Ok(ops) => ops,
            Err(err) => {
                log::debug!("Cannot highlight {} code: {}", language, err);
                return None;
            }
        };

        let mut tokens: Vec<(Option<&'static str>, String)> = Vec::new();
        for (text, op) in ScopeRegionIterator::new(&ops, line) {
            if let Err(err) = stack.apply(op) {
                log::debug!("Cannot highlight {} code: {:?}", language, err);
                return None;
            }
            let text = text.trim_end_matches('\n');
            if text.is_empty() {
                continue;
            }
            let class = token_class(&stack);
            match tokens.last_mut() {
                Some((last, value)) if *last == class => value.push_str(text),
                _ => tokens.push((class, text.to_string())),
            }
        }

        for (class, text) in &tokens {
            match class {
                Some(class) => {
                    let _ = write!(
                        html,
                        "<span class=\"hljs-{}\">{}</span>",
                        class,
                        encode_text(text)
                    );
                }
                None => html.push_str(&encode_text(text)),
            }
        }
        if line.ends_with('\n') {
            html.push('\n');
        }
    }

    Some(html)
}

fn token_class(stack: &ScopeStack) -> Option<&'static str> {
    stack.as_slice().iter().rev().find_map(|scope| {
        let name = scope.build_string();
        let root = name.split('.').next().unwrap_or_default();
        TOKEN_SCOPES.iter().copied().find(|candidate| *candidate == root)
    })
}

/// Runs the configured highlighter over every `<pre><code>` block.
pub fn highlight_code(nodes: &mut [HtmlNode], ctx: &StageContext<'_>) {
    walk_elements_mut(nodes, &mut |element| {
        if element.tag != "pre" {
            return;
        }
        if let Some(code) = element.child_element_mut("code") {
            let language = code.language().map(str::to_string);
            ctx.highlighter.highlight(language.as_deref(), code);
        }
    });
}
