//! Pull events - the flat representation of tree structure.
//!
//! This is a SAX-style event model: a tree streams as a flat, ordered
//! sequence of events, with nesting represented by start/end pairs.
//!
//! An element `<a xmlns:x="urn:x">hi<x:b/></a>` streams as:
//! ```text
//! StartElement { tag: a, attrs: [], nss: {x → urn:x} }
//! Chars("hi")
//! EmptyElement { tag: x:b, attrs: [], nss: {x → urn:x} }
//! EndElement
//! ```
//!
//! The `nss` field on element events is the complete resolved environment
//! at that node (ancestor scope merged with local xmlns declarations);
//! `attrs` never contains xmlns keys - those are split off into `nss`.

use std::fmt;

use crate::ns::NsEnv;
use crate::qname::QName;

/// Line/column position in the original source, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An ordered attribute entry. Order is preserved for stable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: QName,
    pub value: String,
}

impl Attr {
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Attr { name, value: value.into() }
    }
}

/// A recoverable upstream failure, carried through the event stream as data.
///
/// Engines never synthesize these - they pass them through so consumers can
/// observe failures in-band, without a separate error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub location: Option<Location>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError { message: message.into(), location: None }
    }

    pub fn at(message: impl Into<String>, location: Location) -> Self {
        ParseError { message: message.into(), location: Some(location) }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{} at {}", self.message, loc),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// One pull event.
///
/// Every `StartElement` is matched by exactly one `EndElement` at the same
/// depth; `EmptyElement` has no matching end.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Opens a named element with its resolved namespace context.
    StartElement {
        tag: QName,
        attrs: Vec<Attr>,
        nss: NsEnv,
        location: Option<Location>,
    },

    /// Closes the innermost open element.
    EndElement,

    /// Self-closing element, no content and no matching end.
    EmptyElement {
        tag: QName,
        attrs: Vec<Attr>,
        nss: NsEnv,
        location: Option<Location>,
    },

    /// Character data.
    Chars { text: String },

    /// CDATA section.
    CData { text: String },

    /// Comment text.
    Comment { text: String },

    /// An emitted qualified-name value (e.g. used as an attribute value).
    QName { name: QName },

    /// A recoverable upstream error, flowing in-band.
    Error { error: ParseError },
}

impl Event {
    /// Shorthand for a `Chars` event.
    pub fn chars(text: impl Into<String>) -> Self {
        Event::Chars { text: text.into() }
    }

    /// Shorthand for a `CData` event.
    pub fn cdata(text: impl Into<String>) -> Self {
        Event::CData { text: text.into() }
    }

    /// Shorthand for a `Comment` event.
    pub fn comment(text: impl Into<String>) -> Self {
        Event::Comment { text: text.into() }
    }

    /// True exactly for `EndElement` - the end-of-scope predicate used when
    /// walking a flat sequence to find the close of a previously seen start.
    #[inline]
    pub fn is_exit(&self) -> bool {
        matches!(self, Event::EndElement)
    }

    /// Check if this is an error event.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error { .. })
    }

    /// Check if this event carries element content (Chars/CData/Comment).
    #[inline]
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            Event::Chars { .. } | Event::CData { .. } | Event::Comment { .. }
        )
    }

    /// The element tag, for start and empty events.
    pub fn element_tag(&self) -> Option<&QName> {
        match self {
            Event::StartElement { tag, .. } | Event::EmptyElement { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// The source location, where the event carries one.
    pub fn location(&self) -> Option<Location> {
        match self {
            Event::StartElement { location, .. } | Event::EmptyElement { location, .. } => {
                *location
            }
            Event::Error { error } => error.location,
            _ => None,
        }
    }
}
