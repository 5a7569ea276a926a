//! Producible values: everything the engines know how to turn into events.
//!
//! `Value` is the closed sum of producible categories; the open extension
//! point is [`crate::push::Pushable`] plus a `From<T> for Value` conversion,
//! so foreign types join without touching the engines.
//!
//! Scalars stream as character data using the canonical textual form from
//! [`Value::scalar_text`]. `Nil` streams as an empty `Chars` event, so
//! heterogeneous content lists need no null-filtering.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::event::Event;
use crate::node::{Element, Node};
use crate::qname::QName;

/// A value that can be pushed at a handler or pulled as events.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; streams as empty character data.
    Nil,
    /// Boolean, rendered `true`/`false`.
    Bool(bool),
    /// Integer, rendered in decimal.
    Int(i64),
    /// Floating point, rendered via `Display`.
    Float(f64),
    /// Character data.
    Text(String),
    /// Binary blob, rendered as lowercase hex.
    Bytes(Vec<u8>),
    /// Timestamp in its textual form, rendered verbatim.
    Timestamp(String),
    /// URI/URL, rendered verbatim.
    Uri(String),
    /// A qualified-name token; streams as a `QName` event.
    Name(QName),
    /// An element subtree.
    Element(Element),
    /// A CDATA section.
    CData(String),
    /// A comment.
    Comment(String),
    /// An already-formed event; streams as itself.
    Event(Event),
    /// An ordered sequence, flattened left-to-right when streamed.
    Seq(Vec<Value>),
    /// A lazily-produced run of values; the producer is advanced only as
    /// events are requested. Usable anywhere a sequence is, including
    /// element content.
    Lazy(LazyValues),
}

/// A restartable producer of values for lazy trees.
///
/// Holds a factory rather than an iterator, so the handle can be cloned
/// and each traversal gets a fresh run. Two handles compare equal only
/// when they share the same factory.
#[derive(Clone)]
pub struct LazyValues {
    producer: Arc<dyn Fn() -> Box<dyn Iterator<Item = Value>>>,
}

impl LazyValues {
    /// Wrap a factory that starts a fresh iteration on every call.
    pub fn new<F, I>(producer: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = Value> + 'static,
    {
        LazyValues {
            producer: Arc::new(move || Box::new(producer())),
        }
    }

    /// Start a fresh run of the produced values.
    pub fn iter(&self) -> Box<dyn Iterator<Item = Value>> {
        (self.producer)()
    }
}

impl fmt::Debug for LazyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyValues")
    }
}

impl PartialEq for LazyValues {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.producer, &other.producer)
    }
}

impl Value {
    /// Build a `Bytes` value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Check if this is the absent value.
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Get the element if this is an element value.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Value::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Canonical textual form of scalar variants; `None` for structured
    /// variants (elements, names, events, sequences, CDATA, comments).
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Nil => Some(Cow::Borrowed("")),
            Value::Bool(true) => Some(Cow::Borrowed("true")),
            Value::Bool(false) => Some(Cow::Borrowed("false")),
            Value::Int(n) => Some(Cow::Owned(n.to_string())),
            Value::Float(x) => Some(Cow::Owned(x.to_string())),
            Value::Text(s) | Value::Timestamp(s) | Value::Uri(s) => Some(Cow::Borrowed(s)),
            Value::Bytes(b) => Some(Cow::Owned(hex_lower(b))),
            _ => None,
        }
    }
}

/// Lowercase hex rendering for binary blobs.
pub(crate) fn hex_lower(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<QName> for Value {
    fn from(name: QName) -> Self {
        Value::Name(name)
    }
}

impl From<Element> for Value {
    fn from(el: Element) -> Self {
        Value::Element(el)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Element(el) => Value::Element(el),
            Node::Text(s) => Value::Text(s),
            Node::CData(s) => Value::CData(s),
            Node::Comment(s) => Value::Comment(s),
        }
    }
}

impl From<Event> for Value {
    fn from(event: Event) -> Self {
        Value::Event(event)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Nil,
        }
    }
}
