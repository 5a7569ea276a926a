//! Tree nodes: elements, text, CDATA sections, and comments.
//!
//! An [`Element`] owns its attributes and an ordered, heterogeneous content
//! list of [`Value`]s, so trees can mix child elements, text, and scalar
//! values without wrappers. The optional `env` field attaches the ancestor
//! namespace scope explicitly (there is no out-of-band metadata channel);
//! `location` likewise carries source position when the tree came from a
//! parser.

use crate::event::{Attr, Location};
use crate::ns::{split_ns_attrs, NsEnv};
use crate::qname::QName;
use crate::value::Value;

/// An element node: tag, ordered attributes, ordered content.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: QName,
    pub attrs: Vec<Attr>,
    pub content: Vec<Value>,
    /// Ancestor namespace scope, when attached. Traversal engines thread
    /// the scope themselves; this field seeds a tree pulled mid-document.
    pub env: Option<NsEnv>,
    pub location: Option<Location>,
}

impl Element {
    /// Create an empty element with the given tag.
    pub fn new(tag: QName) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            content: Vec::new(),
            env: None,
            location: None,
        }
    }

    /// Append an attribute (builder style).
    pub fn attr(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attrs.push(Attr::new(name, value));
        self
    }

    /// Append a content item (builder style).
    pub fn child(mut self, value: impl Into<Value>) -> Self {
        self.content.push(value.into());
        self
    }

    /// Attach an ancestor namespace scope (builder style).
    pub fn env(mut self, env: NsEnv) -> Self {
        self.env = Some(env);
        self
    }

    /// Attach a source location (builder style).
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Split this element's attributes into (xmlns delta, ordinary attrs).
    pub fn split_attrs(&self) -> (Vec<(String, String)>, Vec<Attr>) {
        split_ns_attrs(&self.attrs)
    }

    /// The complete environment visible at this node: the attached scope
    /// (or `inherited` when none is attached) merged with the element's own
    /// xmlns declarations.
    pub fn namespace_env(&self, inherited: &NsEnv) -> NsEnv {
        let scope = self.env.as_ref().unwrap_or(inherited);
        let (delta, _) = self.split_attrs();
        scope.merge(&delta)
    }

    /// Look up an ordinary attribute value by qualified name.
    pub fn attr_value(&self, name: &QName) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| &a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Take the element apart, leaving an empty shell behind.
    ///
    /// `Element` has a `Drop` impl, so fields cannot be moved out by
    /// destructuring; this is the owned decomposition consumers use instead.
    pub(crate) fn into_parts(
        mut self,
    ) -> (QName, Vec<Attr>, Vec<Value>, Option<NsEnv>, Option<Location>) {
        (
            std::mem::replace(&mut self.tag, QName::new("")),
            std::mem::take(&mut self.attrs),
            std::mem::take(&mut self.content),
            self.env.take(),
            self.location.take(),
        )
    }
}

/// Teardown must not recurse with tree depth: the derived drop glue for
/// `Element -> Vec<Value> -> Element` would overflow the stack on trees
/// nested tens of thousands of levels deep. Nested content is drained into
/// a flat worklist instead, so every inner element drops empty.
impl Drop for Element {
    fn drop(&mut self) {
        if self.content.is_empty() {
            return;
        }
        let mut pending = std::mem::take(&mut self.content);
        while let Some(value) = pending.pop() {
            match value {
                Value::Element(mut el) => pending.append(&mut el.content),
                Value::Seq(mut items) => pending.append(&mut items),
                _ => {}
            }
        }
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

impl Node {
    /// Build a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Build a CDATA node.
    pub fn cdata(text: impl Into<String>) -> Self {
        Node::CData(text.into())
    }

    /// Build a comment node.
    pub fn comment(text: impl Into<String>) -> Self {
        Node::Comment(text.into())
    }

    /// Get the element if this is an element node.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Get the text if this is a text node.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}
