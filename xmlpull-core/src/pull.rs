//! Pull engine: a tree streamed as a lazy sequence of events.
//!
//! [`PullEvents`] yields the same events, in the same order, that the push
//! engine would deliver to a recording handler - but one at a time, on
//! demand. Nothing past the requested event is computed.
//!
//! # Worklist
//!
//! Nesting state lives in an explicit worklist, not on the call stack: each
//! entry is either a pending value (with the namespace scope it will resolve
//! against), a lazy producer of further values, or the end-of-element
//! sentinel. Expanding an element pushes its children plus the sentinel;
//! popping the sentinel yields `EndElement`. Call-stack depth therefore
//! stays constant no matter how deep or wide the input tree is.

use std::fmt;

use crate::event::Event;
use crate::node::Element;
use crate::ns::{split_ns_attrs, NsEnv};
use crate::value::{hex_lower, Value};

/// One pending entry in the worklist.
enum WorkItem {
    /// A value still to be expanded, with the scope it resolves against.
    Value { value: Value, scope: NsEnv },
    /// A lazily-produced run of sibling values.
    Lazy {
        source: Box<dyn Iterator<Item = Value>>,
        scope: NsEnv,
    },
    /// Emit `EndElement` for the innermost open element.
    End,
}

/// Lazy event sequence over a tree value.
///
/// Finite whenever the source is finite, and restartable by rebuilding it
/// from a re-creatable source. Suspension is simply not calling `next()`.
pub struct PullEvents {
    /// Worklist, used as a stack: the top entry produces the next event.
    stack: Vec<WorkItem>,
}

impl PullEvents {
    /// Pull events from `value` with an empty root scope.
    pub fn new(value: impl Into<Value>) -> Self {
        PullEvents::in_scope(value, NsEnv::new())
    }

    /// Pull events from `value`, resolving namespaces against `scope`.
    pub fn in_scope(value: impl Into<Value>, scope: NsEnv) -> Self {
        PullEvents {
            stack: vec![WorkItem::Value { value: value.into(), scope }],
        }
    }

    /// Pull events from values produced incrementally by an iterator,
    /// with an empty root scope.
    ///
    /// The iterator is advanced only as events are requested, so a source
    /// that materializes its tree lazily streams without being forced.
    pub fn from_values<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        PullEvents::from_values_in_scope(source, NsEnv::new())
    }

    /// Pull events from values produced incrementally by an iterator,
    /// resolving namespaces against `scope`.
    pub fn from_values_in_scope<I>(source: I, scope: NsEnv) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        PullEvents {
            stack: vec![WorkItem::Lazy {
                source: Box::new(source.into_iter()),
                scope,
            }],
        }
    }

    /// Open an element: emit its head event and queue its continuation.
    fn open_element(&mut self, el: Element, inherited: NsEnv) -> Event {
        let (tag, attrs, content, env, location) = el.into_parts();
        let scope = env.unwrap_or(inherited);
        let (delta, ordinary) = split_ns_attrs(&attrs);
        let nss = scope.merge(&delta);

        if content.is_empty() {
            return Event::EmptyElement { tag, attrs: ordinary, nss, location };
        }

        self.stack.push(WorkItem::End);
        for child in content.into_iter().rev() {
            self.stack.push(WorkItem::Value { value: child, scope: nss.clone() });
        }
        Event::StartElement { tag, attrs: ordinary, nss, location }
    }
}

impl Iterator for PullEvents {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            match self.stack.pop()? {
                WorkItem::End => return Some(Event::EndElement),

                WorkItem::Lazy { mut source, scope } => {
                    if let Some(value) = source.next() {
                        // Re-queue the producer under the value it yielded,
                        // so remaining siblings keep their place.
                        self.stack.push(WorkItem::Lazy { source, scope: scope.clone() });
                        self.stack.push(WorkItem::Value { value, scope });
                    }
                }

                WorkItem::Value { value, scope } => match value {
                    Value::Seq(items) => {
                        for item in items.into_iter().rev() {
                            self.stack.push(WorkItem::Value {
                                value: item,
                                scope: scope.clone(),
                            });
                        }
                    }
                    Value::Lazy(lazy) => {
                        self.stack.push(WorkItem::Lazy { source: lazy.iter(), scope });
                    }
                    Value::Element(el) => return Some(self.open_element(el, scope)),
                    Value::Event(event) => return Some(event),
                    Value::Name(name) => return Some(Event::QName { name }),
                    Value::CData(text) => return Some(Event::CData { text }),
                    Value::Comment(text) => return Some(Event::Comment { text }),
                    Value::Nil => return Some(Event::Chars { text: String::new() }),
                    Value::Text(text) | Value::Timestamp(text) | Value::Uri(text) => {
                        return Some(Event::Chars { text })
                    }
                    Value::Bool(b) => {
                        return Some(Event::chars(if b { "true" } else { "false" }))
                    }
                    Value::Int(n) => return Some(Event::chars(n.to_string())),
                    Value::Float(x) => return Some(Event::chars(x.to_string())),
                    Value::Bytes(b) => return Some(Event::chars(hex_lower(&b))),
                },
            }
        }
    }
}

impl fmt::Debug for PullEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullEvents")
            .field("pending", &self.stack.len())
            .finish()
    }
}

/// The head event of a value: what streaming it would emit first.
///
/// Elements map to `StartElement` or `EmptyElement` depending on content;
/// scalars to `Chars`; names to `QName`; an event maps to itself. Sequences
/// and lazy runs map to the head event of their first item that emits one.
/// `None` means the value streams to nothing at all, which only empty (or
/// all-empty) sequences do. Forces lazy producers as far as the head.
pub fn gen_event(value: &Value, scope: &NsEnv) -> Option<Event> {
    match value {
        Value::Element(el) => {
            let scope = el.env.as_ref().unwrap_or(scope);
            let (delta, ordinary) = split_ns_attrs(&el.attrs);
            let nss = scope.merge(&delta);
            let event = if el.content.is_empty() {
                Event::EmptyElement {
                    tag: el.tag.clone(),
                    attrs: ordinary,
                    nss,
                    location: el.location,
                }
            } else {
                Event::StartElement {
                    tag: el.tag.clone(),
                    attrs: ordinary,
                    nss,
                    location: el.location,
                }
            };
            Some(event)
        }
        Value::Event(event) => Some(event.clone()),
        Value::Name(name) => Some(Event::QName { name: name.clone() }),
        Value::CData(text) => Some(Event::CData { text: text.clone() }),
        Value::Comment(text) => Some(Event::Comment { text: text.clone() }),
        Value::Seq(items) => items.iter().find_map(|item| gen_event(item, scope)),
        Value::Lazy(lazy) => lazy.iter().find_map(|item| gen_event(&item, scope)),
        scalar => scalar
            .scalar_text()
            .map(|text| Event::chars(text.into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Attr;
    use crate::qname::QName;
    use crate::value::LazyValues;

    fn pull(value: impl Into<Value>) -> Vec<Event> {
        PullEvents::new(value).collect()
    }

    #[test]
    fn test_pull_scalar() {
        assert_eq!(pull("hi"), vec![Event::chars("hi")]);
        assert_eq!(pull(Value::Int(3)), vec![Event::chars("3")]);
        assert_eq!(pull(Value::Nil), vec![Event::chars("")]);
    }

    #[test]
    fn test_pull_example_scenario() {
        // <a xmlns:x="urn:x">hi<x:b/></a>
        let tree = Element::new(QName::new("a"))
            .attr(QName::prefixed("xmlns", "x"), "urn:x")
            .child("hi")
            .child(Element::new(QName::prefixed("x", "b")));

        let events = pull(tree);
        assert_eq!(events.len(), 4);

        match &events[0] {
            Event::StartElement { tag, attrs, nss, .. } => {
                assert_eq!(tag.local(), "a");
                assert!(attrs.is_empty());
                assert_eq!(nss.get("x"), Some("urn:x"));
            }
            other => panic!("expected StartElement, got {:?}", other),
        }
        assert_eq!(events[1], Event::chars("hi"));
        match &events[2] {
            Event::EmptyElement { tag, nss, .. } => {
                assert_eq!(tag.to_string(), "x:b");
                assert_eq!(nss.get("x"), Some("urn:x"));
            }
            other => panic!("expected EmptyElement, got {:?}", other),
        }
        assert!(events[3].is_exit());
    }

    #[test]
    fn test_pull_sequence_keeps_sibling_order() {
        let value = Value::Seq(vec![
            Value::Seq(vec![Value::from("a"), Value::from("b")]),
            Value::from("c"),
        ]);
        assert_eq!(
            pull(value),
            vec![Event::chars("a"), Event::chars("b"), Event::chars("c")]
        );
    }

    #[test]
    fn test_pull_event_value_is_identity() {
        let event = Event::comment("note");
        assert_eq!(pull(Value::Event(event.clone())), vec![event]);
    }

    #[test]
    fn test_pull_is_lazy_over_value_sources() {
        use std::cell::Cell;
        use std::rc::Rc;

        let produced = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&produced);
        let source = (0..10i64).map(move |n| {
            counter.set(counter.get() + 1);
            Value::Int(n)
        });

        let mut events = PullEvents::from_values(source);
        assert_eq!(events.next(), Some(Event::chars("0")));
        assert_eq!(events.next(), Some(Event::chars("1")));
        // Only the requested values have been produced.
        assert_eq!(produced.get(), 2);
    }

    #[test]
    fn test_lazy_element_content_streams_on_demand() {
        use std::cell::Cell;
        use std::rc::Rc;

        let produced = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&produced);
        let lazy = LazyValues::new(move || {
            let counter = Rc::clone(&counter);
            (0..100i64).map(move |n| {
                counter.set(counter.get() + 1);
                Value::Int(n)
            })
        });
        let el = Element::new(QName::new("run")).child(Value::Lazy(lazy));

        let mut events = PullEvents::new(el);
        assert!(matches!(events.next(), Some(Event::StartElement { .. })));
        assert_eq!(events.next(), Some(Event::chars("0")));
        assert_eq!(events.next(), Some(Event::chars("1")));
        assert_eq!(produced.get(), 2);
    }

    #[test]
    fn test_lazy_content_sees_enclosing_namespace_scope() {
        let lazy = LazyValues::new(|| {
            std::iter::once(Value::Element(Element::new(QName::prefixed("x", "b"))))
        });
        let outer = Element::new(QName::new("a"))
            .attr(QName::prefixed("xmlns", "x"), "urn:x")
            .child(Value::Lazy(lazy));

        let events: Vec<Event> = PullEvents::new(outer).collect();
        match &events[1] {
            Event::EmptyElement { tag, nss, .. } => {
                assert_eq!(tag.to_string(), "x:b");
                assert_eq!(nss.get("x"), Some("urn:x"));
            }
            other => panic!("expected EmptyElement, got {:?}", other),
        }
    }

    #[test]
    fn test_from_values_in_scope_resolves_against_given_scope() {
        let scope = NsEnv::from_bindings([("p".to_owned(), "urn:p".to_owned())]);
        let source = std::iter::once(Value::Element(Element::new(QName::prefixed("p", "q"))));

        let events: Vec<Event> = PullEvents::from_values_in_scope(source, scope).collect();
        match &events[0] {
            Event::EmptyElement { nss, .. } => assert_eq!(nss.get("p"), Some("urn:p")),
            other => panic!("expected EmptyElement, got {:?}", other),
        }
    }

    #[test]
    fn test_gen_event_matches_stream_head() {
        let scope = NsEnv::new();
        let values = [
            Value::Element(Element::new(QName::new("p")).child("x")),
            Value::Seq(Vec::new()),
            Value::Seq(vec![Value::Seq(Vec::new()), Value::from("tail")]),
            Value::Lazy(LazyValues::new(|| std::iter::empty())),
        ];

        for value in values {
            let head = gen_event(&value, &scope);
            let first = PullEvents::new(value).next();
            assert_eq!(head, first);
        }
    }

    #[test]
    fn test_gen_event_splits_xmlns_attrs() {
        let el = Element::new(QName::new("a"))
            .attr(QName::prefixed("xmlns", "x"), "urn:x")
            .attr(QName::new("id"), "n1");
        let event = gen_event(&Value::Element(el), &NsEnv::new()).unwrap();

        match event {
            Event::EmptyElement { attrs, nss, .. } => {
                assert_eq!(attrs, vec![Attr::new(QName::new("id"), "n1")]);
                assert_eq!(nss.get("x"), Some("urn:x"));
            }
            other => panic!("expected EmptyElement, got {:?}", other),
        }
    }

    #[test]
    fn test_pull_nested_namespace_shadowing() {
        let inner = Element::new(QName::prefixed("p", "in"))
            .attr(QName::prefixed("xmlns", "p"), "urn:inner");
        let outer = Element::new(QName::prefixed("p", "out"))
            .attr(QName::prefixed("xmlns", "p"), "urn:outer")
            .child(inner);

        let events = pull(outer);
        match &events[0] {
            Event::StartElement { nss, .. } => assert_eq!(nss.get("p"), Some("urn:outer")),
            other => panic!("expected StartElement, got {:?}", other),
        }
        match &events[1] {
            Event::EmptyElement { nss, .. } => assert_eq!(nss.get("p"), Some("urn:inner")),
            other => panic!("expected EmptyElement, got {:?}", other),
        }
    }
}
