//! Markdown AST to HTML tree and HTML tree to string.

pub mod hast;
pub mod render;
pub mod serialize;

pub use hast::{Element, HtmlNode, rewrite_elements, walk_elements_mut};
pub use render::mdast_to_html;
pub use serialize::to_html;
