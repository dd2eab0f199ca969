//! A minimal element tree for building and serializing SVG/HTML.
//!
//! [`Document`] stands in for a page: renderers look up their mount point
//! with a selector and replace its children.

use std::fmt;

/// Escape a string for safe insertion into markup text or attributes.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A named element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn attr(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set an attribute, replacing any previous value in place.
    pub fn set_attr(&mut self, key: &str, value: impl fmt::Display) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Builder form of [`push`](Self::push).
    pub fn child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Replace all children with a single text node.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children = vec![Node::Text(text.into())];
        self
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Direct element children.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in self.elements() {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    /// Descendant elements with the given name.
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => out.push_str(&e.text_content()),
            }
        }
        out
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.get_attr("id") == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.get_attr("class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == class))
        } else {
            self.name == selector
        }
    }

    /// First element (self included) matching a simple `#id`, `.class` or
    /// tag selector.
    pub fn query_selector_mut(&mut self, selector: &str) -> Option<&mut Element> {
        if self.matches(selector) {
            return Some(self);
        }
        for node in &mut self.children {
            if let Node::Element(child) = node {
                if let Some(found) = child.query_selector_mut(selector) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn query_selector(&self, selector: &str) -> Option<&Element> {
        if self.matches(selector) {
            return Some(self);
        }
        self.elements().find_map(|e| e.query_selector(selector))
    }

    /// Serialize this element and its subtree.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            out.push_str(&format!(" {k}=\"{}\"", escape_xml(v)));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        let block = self.children.iter().any(|n| matches!(n, Node::Element(_)));
        if block {
            out.push('\n');
        }
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(&escape_xml(t)),
                Node::Element(e) => {
                    e.write_to(out);
                    if block {
                        out.push('\n');
                    }
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

/// A page body holding mount points for renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    /// Add an empty `<div id="...">` mount point.
    pub fn with_mount(mut self, id: &str) -> Self {
        self.body.push(Element::new("div").attr("id", id));
        self
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    pub fn query_selector(&self, selector: &str) -> Option<&Element> {
        self.body.query_selector(selector)
    }

    pub fn query_selector_mut(&mut self, selector: &str) -> Option<&mut Element> {
        self.body.query_selector_mut(selector)
    }

    pub fn to_markup(&self) -> String {
        self.body.to_markup()
    }
}
