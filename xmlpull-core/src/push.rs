//! Push engine: drive an event consumer directly from a value.
//!
//! [`push`] walks a value and calls one [`Handler`] method per event,
//! synchronously, threading the namespace scope down the tree. Handler
//! state lives behind `&mut self` - the engine never inspects it.
//!
//! [`Pushable`] is the open extension point: any type that knows how to
//! describe itself as handler calls can be pushed, alongside the built-in
//! [`Value`] categories.

use std::convert::Infallible;

use crate::event::{Attr, Event, Location, ParseError};
use crate::ns::{split_ns_attrs, NsEnv};
use crate::node::{Element, Node};
use crate::qname::QName;
use crate::value::Value;

/// An event consumer: one method per [`Event`] variant.
///
/// Each call may fail with the handler's own error type; the engine stops
/// at the first failure and propagates it.
pub trait Handler {
    type Error;

    fn start_element(
        &mut self,
        tag: &QName,
        attrs: &[Attr],
        nss: &NsEnv,
        location: Option<Location>,
    ) -> Result<(), Self::Error>;

    fn end_element(&mut self) -> Result<(), Self::Error>;

    fn empty_element(
        &mut self,
        tag: &QName,
        attrs: &[Attr],
        nss: &NsEnv,
        location: Option<Location>,
    ) -> Result<(), Self::Error>;

    fn chars(&mut self, text: &str) -> Result<(), Self::Error>;

    fn cdata(&mut self, text: &str) -> Result<(), Self::Error>;

    fn comment(&mut self, text: &str) -> Result<(), Self::Error>;

    fn qname(&mut self, name: &QName) -> Result<(), Self::Error>;

    fn error(&mut self, error: &ParseError) -> Result<(), Self::Error>;
}

/// A value that can drive a [`Handler`].
pub trait Pushable {
    /// Push this value's events at `handler`, resolving namespaces
    /// against `scope`.
    fn push_to<H: Handler>(&self, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error>;
}

/// Push `value` at `handler` with an empty root scope.
pub fn push<V, H>(value: &V, handler: &mut H) -> Result<(), H::Error>
where
    V: Pushable + ?Sized,
    H: Handler,
{
    value.push_to(handler, &NsEnv::new())
}

/// Push `value` at `handler`, resolving namespaces against `scope`.
pub fn push_in_scope<V, H>(value: &V, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error>
where
    V: Pushable + ?Sized,
    H: Handler,
{
    value.push_to(handler, scope)
}

impl Pushable for Value {
    fn push_to<H: Handler>(&self, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error> {
        match self {
            Value::Nil => handler.chars(""),
            Value::Bool(b) => handler.chars(if *b { "true" } else { "false" }),
            Value::Int(n) => handler.chars(&n.to_string()),
            Value::Float(x) => handler.chars(&x.to_string()),
            Value::Text(s) | Value::Timestamp(s) | Value::Uri(s) => handler.chars(s),
            Value::Bytes(b) => handler.chars(&crate::value::hex_lower(b)),
            Value::Name(name) => handler.qname(name),
            Value::Element(el) => el.push_to(handler, scope),
            Value::CData(text) => handler.cdata(text),
            Value::Comment(text) => handler.comment(text),
            Value::Event(event) => event.push_to(handler, scope),
            Value::Seq(items) => {
                for item in items {
                    item.push_to(handler, scope)?;
                }
                Ok(())
            }
            Value::Lazy(lazy) => {
                for item in lazy.iter() {
                    item.push_to(handler, scope)?;
                }
                Ok(())
            }
        }
    }
}

impl Pushable for Element {
    fn push_to<H: Handler>(&self, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error> {
        let scope = self.env.as_ref().unwrap_or(scope);
        let (delta, ordinary) = split_ns_attrs(&self.attrs);
        let merged = scope.merge(&delta);

        if self.content.is_empty() {
            handler.empty_element(&self.tag, &ordinary, &merged, self.location)
        } else {
            handler.start_element(&self.tag, &ordinary, &merged, self.location)?;
            for child in &self.content {
                child.push_to(handler, &merged)?;
            }
            handler.end_element()
        }
    }
}

impl Pushable for Node {
    fn push_to<H: Handler>(&self, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error> {
        match self {
            Node::Element(el) => el.push_to(handler, scope),
            Node::Text(text) => handler.chars(text),
            Node::CData(text) => handler.cdata(text),
            Node::Comment(text) => handler.comment(text),
        }
    }
}

/// An already-formed event replays itself onto the matching handler method.
impl Pushable for Event {
    fn push_to<H: Handler>(&self, handler: &mut H, _scope: &NsEnv) -> Result<(), H::Error> {
        match self {
            Event::StartElement { tag, attrs, nss, location } => {
                handler.start_element(tag, attrs, nss, *location)
            }
            Event::EndElement => handler.end_element(),
            Event::EmptyElement { tag, attrs, nss, location } => {
                handler.empty_element(tag, attrs, nss, *location)
            }
            Event::Chars { text } => handler.chars(text),
            Event::CData { text } => handler.cdata(text),
            Event::Comment { text } => handler.comment(text),
            Event::QName { name } => handler.qname(name),
            Event::Error { error } => handler.error(error),
        }
    }
}

impl Pushable for QName {
    fn push_to<H: Handler>(&self, handler: &mut H, _scope: &NsEnv) -> Result<(), H::Error> {
        handler.qname(self)
    }
}

impl Pushable for str {
    fn push_to<H: Handler>(&self, handler: &mut H, _scope: &NsEnv) -> Result<(), H::Error> {
        handler.chars(self)
    }
}

impl Pushable for String {
    fn push_to<H: Handler>(&self, handler: &mut H, _scope: &NsEnv) -> Result<(), H::Error> {
        handler.chars(self)
    }
}

impl Pushable for bool {
    fn push_to<H: Handler>(&self, handler: &mut H, _scope: &NsEnv) -> Result<(), H::Error> {
        handler.chars(if *self { "true" } else { "false" })
    }
}

impl Pushable for i64 {
    fn push_to<H: Handler>(&self, handler: &mut H, _scope: &NsEnv) -> Result<(), H::Error> {
        handler.chars(&self.to_string())
    }
}

impl Pushable for f64 {
    fn push_to<H: Handler>(&self, handler: &mut H, _scope: &NsEnv) -> Result<(), H::Error> {
        handler.chars(&self.to_string())
    }
}

/// Sequences push each member left-to-right, threading scope through every
/// call; nested sequences flatten recursively in the same order.
impl<T: Pushable> Pushable for [T] {
    fn push_to<H: Handler>(&self, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error> {
        for item in self {
            item.push_to(handler, scope)?;
        }
        Ok(())
    }
}

impl<T: Pushable> Pushable for Vec<T> {
    fn push_to<H: Handler>(&self, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error> {
        self.as_slice().push_to(handler, scope)
    }
}

/// `None` pushes as empty character data, so heterogeneous content lists
/// need no null-filtering.
impl<T: Pushable> Pushable for Option<T> {
    fn push_to<H: Handler>(&self, handler: &mut H, scope: &NsEnv) -> Result<(), H::Error> {
        match self {
            Some(value) => value.push_to(handler, scope),
            None => handler.chars(""),
        }
    }
}

/// A [`Handler`] that records every call as an [`Event`].
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    pub fn new() -> Self {
        EventRecorder::default()
    }

    /// Events recorded so far, in call order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consume the recorder, returning the recorded events.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Handler for EventRecorder {
    type Error = Infallible;

    fn start_element(
        &mut self,
        tag: &QName,
        attrs: &[Attr],
        nss: &NsEnv,
        location: Option<Location>,
    ) -> Result<(), Infallible> {
        self.events.push(Event::StartElement {
            tag: tag.clone(),
            attrs: attrs.to_vec(),
            nss: nss.clone(),
            location,
        });
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::EndElement);
        Ok(())
    }

    fn empty_element(
        &mut self,
        tag: &QName,
        attrs: &[Attr],
        nss: &NsEnv,
        location: Option<Location>,
    ) -> Result<(), Infallible> {
        self.events.push(Event::EmptyElement {
            tag: tag.clone(),
            attrs: attrs.to_vec(),
            nss: nss.clone(),
            location,
        });
        Ok(())
    }

    fn chars(&mut self, text: &str) -> Result<(), Infallible> {
        self.events.push(Event::chars(text));
        Ok(())
    }

    fn cdata(&mut self, text: &str) -> Result<(), Infallible> {
        self.events.push(Event::cdata(text));
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), Infallible> {
        self.events.push(Event::comment(text));
        Ok(())
    }

    fn qname(&mut self, name: &QName) -> Result<(), Infallible> {
        self.events.push(Event::QName { name: name.clone() });
        Ok(())
    }

    fn error(&mut self, error: &ParseError) -> Result<(), Infallible> {
        self.events.push(Event::Error { error: error.clone() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<V: Pushable + ?Sized>(value: &V) -> Vec<Event> {
        let mut recorder = EventRecorder::new();
        push(value, &mut recorder).unwrap();
        recorder.into_events()
    }

    #[test]
    fn test_push_scalars_as_chars() {
        assert_eq!(record("hi"), vec![Event::chars("hi")]);
        assert_eq!(record(&true), vec![Event::chars("true")]);
        assert_eq!(record(&7i64), vec![Event::chars("7")]);
        assert_eq!(record(&Value::Nil), vec![Event::chars("")]);
    }

    #[test]
    fn test_push_qname() {
        let name = QName::prefixed("x", "k");
        assert_eq!(record(&name), vec![Event::QName { name: name.clone() }]);
    }

    #[test]
    fn test_push_empty_element() {
        let el = Element::new(QName::new("br"));
        let events = record(&el);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Event::EmptyElement { tag, .. } if tag.local() == "br"));
    }

    #[test]
    fn test_push_element_with_content() {
        let el = Element::new(QName::new("p")).child("hi");
        let events = record(&el);

        assert!(matches!(&events[0], Event::StartElement { tag, .. } if tag.local() == "p"));
        assert_eq!(events[1], Event::chars("hi"));
        assert_eq!(events[2], Event::EndElement);
    }

    #[test]
    fn test_push_threads_namespace_scope() {
        let el = Element::new(QName::new("a"))
            .attr(QName::prefixed("xmlns", "x"), "urn:x")
            .child(Element::new(QName::prefixed("x", "b")));
        let events = record(&el);

        // Child inherits the parent's merged environment
        match &events[1] {
            Event::EmptyElement { tag, attrs, nss, .. } => {
                assert_eq!(tag.to_string(), "x:b");
                assert!(attrs.is_empty());
                assert_eq!(nss.get("x"), Some("urn:x"));
            }
            other => panic!("expected EmptyElement, got {:?}", other),
        }
        // xmlns attrs never appear as ordinary attrs
        match &events[0] {
            Event::StartElement { attrs, nss, .. } => {
                assert!(attrs.is_empty());
                assert_eq!(nss.get("x"), Some("urn:x"));
            }
            other => panic!("expected StartElement, got {:?}", other),
        }
    }

    #[test]
    fn test_push_flattens_nested_sequences() {
        let value = Value::Seq(vec![
            Value::Seq(vec![Value::from("a"), Value::from("b")]),
            Value::Seq(vec![Value::from("c")]),
        ]);
        assert_eq!(
            record(&value),
            vec![Event::chars("a"), Event::chars("b"), Event::chars("c")]
        );
    }

    #[test]
    fn test_push_none_is_empty_chars() {
        let value: Option<String> = None;
        assert_eq!(record(&value), vec![Event::chars("")]);
    }

    #[test]
    fn test_push_event_replays_itself() {
        let event = Event::Error { error: ParseError::new("upstream") };
        assert_eq!(record(&event), vec![event.clone()]);
    }
}
