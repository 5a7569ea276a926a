//! XML event bridge core.
//!
//! Bidirectional bridge between a tree-shaped document model (elements,
//! text, CDATA, comments) and a flat, ordered stream of pull-style parse
//! events. Works the same whether the tree is fully materialized or
//! produced incrementally, and extends to new value types through the
//! [`push::Pushable`] trait and `From<T> for Value` conversions.
//!
//! # Architecture
//!
//! - **qname.rs** - Qualified names and name validation
//! - **ns.rs** - Namespace environments (merge, xmlns/attr splitting)
//! - **event.rs** - The eight event variants
//! - **node.rs** - Tree nodes and element builders
//! - **value.rs** - Producible value categories
//! - **push.rs** - Handler-driven traversal (push)
//! - **pull.rs** - Worklist-driven lazy event iterator (pull)
//! - **rebuild.rs** - Events back into tree nodes
//!
//! Character-stream parsing and serialization to bytes live outside this
//! crate; raw parser events are assumed to already arrive as [`Event`]
//! values.

pub mod event;
pub mod node;
pub mod ns;
pub mod pull;
pub mod push;
pub mod qname;
pub mod rebuild;
pub mod value;

pub use event::{Attr, Event, Location, ParseError};
pub use node::{Element, Node};
pub use ns::{split_ns_attrs, NsEnv};
pub use pull::{gen_event, PullEvents};
pub use push::{push, push_in_scope, EventRecorder, Handler, Pushable};
pub use qname::{NameError, QName};
pub use rebuild::{build, event_element, event_node, RebuildError};
pub use value::{LazyValues, Value};
