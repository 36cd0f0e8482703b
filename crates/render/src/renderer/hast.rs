//! A small HTML tree that the post-transforms rewrite before serialization.

/// One node of the HTML tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HtmlNode {
    /// An element with attributes and children.
    Element(Element),
    /// Text content, escaped when serialized.
    Text(String),
    /// Markup passed through verbatim (raw HTML from the source, placeholders).
    Raw(String),
}

impl HtmlNode {
    /// Text node shorthand.
    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Text(value.into())
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            HtmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable access to the element, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            HtmlNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for HtmlNode {
    fn from(element: Element) -> Self {
        HtmlNode::Element(element)
    }
}

/// An HTML element. Attributes keep insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attribute name/value pairs.
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<HtmlNode>,
}

impl Element {
    /// An element without attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form that replaces the children.
    pub fn with_children(mut self, children: Vec<HtmlNode>) -> Self {
        self.children = children;
        self
    }

    /// Returns true for `h1` through `h6`.
    pub fn is_heading(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    /// Value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Removes an attribute and returns its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Class names in the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    /// Returns true if the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|existing| existing == class)
    }

    /// Appends a class name unless it is already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute("class", classes);
    }

    /// The `xyz` of a `language-xyz` class.
    pub fn language(&self) -> Option<&str> {
        self.classes().find_map(|class| class.strip_prefix("language-"))
    }

    /// Concatenation of the text children only, without descending.
    pub fn direct_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                HtmlNode::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Concatenation of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        collect_text(&self.children, &mut buffer);
        buffer
    }

    /// First child element with the given tag.
    pub fn child_element(&self, tag: &str) -> Option<&Element> {
        self.children
            .iter()
            .filter_map(HtmlNode::as_element)
            .find(|child| child.tag == tag)
    }

    /// Mutable form of [`Element::child_element`].
    pub fn child_element_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(HtmlNode::as_element_mut)
            .find(|child| child.tag == tag)
    }
}

fn collect_text(nodes: &[HtmlNode], buffer: &mut String) {
    for node in nodes {
        match node {
            HtmlNode::Text(text) => buffer.push_str(text),
            HtmlNode::Element(element) => collect_text(&element.children, buffer),
            HtmlNode::Raw(_) => {}
        }
    }
}

/// Visits every element, parents before their children.
pub fn walk_elements_mut<F>(nodes: &mut [HtmlNode], f: &mut F)
where
    F: FnMut(&mut Element),
{
    for node in nodes {
        if let HtmlNode::Element(element) = node {
            f(element);
            walk_elements_mut(&mut element.children, f);
        }
    }
}

/// Replaces every element with the node `f` returns.
///
/// Children are rewritten before their parent, and the replacement is not
/// visited again, so wrapping an element in a new parent cannot loop.
pub fn rewrite_elements<F>(nodes: &mut [HtmlNode], f: &mut F)
where
    F: FnMut(Element) -> HtmlNode,
{
    for node in nodes {
        let taken = std::mem::replace(node, HtmlNode::Raw(String::new()));
        *node = match taken {
            HtmlNode::Element(mut element) => {
                rewrite_elements(&mut element.children, f);
                f(element)
            }
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_helpers() {
        let mut element = Element::new("code").with_attribute("class", "language-rust");
        assert_eq!(element.language(), Some("rust"));
        element.add_class("hljs");
        element.add_class("hljs");
        assert_eq!(element.attribute("class"), Some("language-rust hljs"));
        assert!(element.has_class("hljs"));
        assert!(!element.has_class("hl"));
    }

    #[test]
    fn attributes_replace_in_place() {
        let mut element = Element::new("a")
            .with_attribute("href", "/a")
            .with_attribute("title", "t");
        element.set_attribute("href", "/b");
        assert_eq!(
            element.attributes,
            vec![
                ("href".to_string(), "/b".to_string()),
                ("title".to_string(), "t".to_string())
            ]
        );
        assert_eq!(element.remove_attribute("title").as_deref(), Some("t"));
        assert_eq!(element.remove_attribute("title"), None);
    }

    #[test]
    fn direct_text_skips_nested_elements() {
        let element = Element::new("h2").with_children(vec![
            HtmlNode::text("Use "),
            Element::new("em")
                .with_children(vec![HtmlNode::text("this")])
                .into(),
            HtmlNode::text(" API"),
        ]);
        assert_eq!(element.direct_text(), "Use  API");
        assert_eq!(element.text_content(), "Use this API");
    }

    #[test]
    fn rewrite_does_not_revisit_replacements() {
        let mut nodes = vec![HtmlNode::from(Element::new("pre"))];
        let mut calls = 0;
        rewrite_elements(&mut nodes, &mut |element: Element| {
            calls += 1;
            if element.tag == "pre" {
                Element::new("div").with_children(vec![element.into()]).into()
            } else {
                element.into()
            }
        });
        assert_eq!(calls, 1);
        let wrapper = nodes[0].as_element().expect("element");
        assert_eq!(wrapper.tag, "div");
        assert!(wrapper.child_element("pre").is_some());
    }
}
