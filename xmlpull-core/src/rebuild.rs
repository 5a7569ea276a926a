//! Reconstruction: turning a flat event sequence back into tree nodes.
//!
//! The inverse of the engines. [`event_element`] and [`event_node`] map a
//! single event back to a node; [`build`] folds a whole stream into a
//! forest using an explicit element stack. [`Event::is_exit`] is the
//! end-of-scope predicate for callers that walk the flat sequence and
//! track depth themselves.

use std::fmt;

use crate::event::{Event, ParseError};
use crate::node::{Element, Node};
use crate::value::Value;

/// Errors from reconstructing nodes out of events.
#[derive(Debug, Clone, PartialEq)]
pub enum RebuildError {
    /// `event_node` was called on an event that carries no content.
    /// The offending event is kept for diagnostics.
    NotContent(Event),
    /// An `EndElement` arrived with no element open.
    UnbalancedEnd,
    /// The stream ended while elements were still open.
    Unclosed(usize),
    /// An upstream `Error` event was encountered mid-stream.
    Upstream(ParseError),
}

impl fmt::Display for RebuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebuildError::NotContent(event) => {
                write!(f, "not a content-bearing event: {:?}", event)
            }
            RebuildError::UnbalancedEnd => f.write_str("end event with no open element"),
            RebuildError::Unclosed(n) => write!(f, "stream ended with {} open element(s)", n),
            RebuildError::Upstream(error) => write!(f, "upstream error: {}", error),
        }
    }
}

impl std::error::Error for RebuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RebuildError::Upstream(error) => Some(error),
            _ => None,
        }
    }
}

/// Build an element from a start or empty event plus its content.
///
/// Returns `None` for every other event kind - callers pattern on this to
/// pick a reconstruction strategy, it is not an error.
pub fn event_element(event: &Event, content: Vec<Value>) -> Option<Element> {
    match event {
        Event::StartElement { tag, attrs, nss, location }
        | Event::EmptyElement { tag, attrs, nss, location } => Some(Element {
            tag: tag.clone(),
            attrs: attrs.clone(),
            content,
            env: Some(nss.clone()),
            location: *location,
        }),
        _ => None,
    }
}

/// Build a content node from a Chars, CData, or Comment event.
///
/// Any other event kind is a misuse and is reported, carrying the
/// offending event.
pub fn event_node(event: &Event) -> Result<Node, RebuildError> {
    match event {
        Event::Chars { text } => Ok(Node::Text(text.clone())),
        Event::CData { text } => Ok(Node::CData(text.clone())),
        Event::Comment { text } => Ok(Node::Comment(text.clone())),
        other => Err(RebuildError::NotContent(other.clone())),
    }
}

/// Fold a whole event stream back into a forest of nodes.
///
/// Start events open an element on an explicit stack; the matching end
/// event closes it into its parent. The event's resolved namespace
/// environment becomes the rebuilt element's attached scope, so the
/// reconstruction round-trips `namespace_env`. An `Error` event aborts
/// with [`RebuildError::Upstream`].
pub fn build<I>(events: I) -> Result<Vec<Node>, RebuildError>
where
    I: IntoIterator<Item = Event>,
{
    let mut open: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    fn place(open: &mut [Element], roots: &mut Vec<Node>, node: Node) {
        match open.last_mut() {
            Some(parent) => parent.content.push(Value::from(node)),
            None => roots.push(node),
        }
    }

    for event in events {
        match event {
            Event::StartElement { tag, attrs, nss, location } => {
                open.push(Element {
                    tag,
                    attrs,
                    content: Vec::new(),
                    env: Some(nss),
                    location,
                });
            }
            Event::EndElement => {
                let el = open.pop().ok_or(RebuildError::UnbalancedEnd)?;
                place(&mut open, &mut roots, Node::Element(el));
            }
            Event::EmptyElement { tag, attrs, nss, location } => {
                let el = Element {
                    tag,
                    attrs,
                    content: Vec::new(),
                    env: Some(nss),
                    location,
                };
                place(&mut open, &mut roots, Node::Element(el));
            }
            Event::Chars { text } => place(&mut open, &mut roots, Node::Text(text)),
            Event::CData { text } => place(&mut open, &mut roots, Node::CData(text)),
            Event::Comment { text } => place(&mut open, &mut roots, Node::Comment(text)),
            Event::Error { error } => return Err(RebuildError::Upstream(error)),
            other @ Event::QName { .. } => return Err(RebuildError::NotContent(other)),
        }
    }

    if !open.is_empty() {
        return Err(RebuildError::Unclosed(open.len()));
    }
    Ok(roots)
}
