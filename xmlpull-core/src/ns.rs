//! Namespace environments: resolved prefix→URI bindings.
//!
//! An [`NsEnv`] is the set of bindings visible at one point in a tree. It is
//! a value: merging a child's declarations into a parent scope produces a
//! new environment and never touches the parent, so ancestors can be shared
//! freely by every descendant.
//!
//! [`split_ns_attrs`] is the other half of this module: it partitions an
//! attribute list into xmlns declarations (the merge delta) and ordinary
//! attributes, so element events never carry xmlns keys in `attrs`.

use std::collections::BTreeMap;
use std::sync::Arc;

use phf::phf_map;

use crate::event::Attr;

/// Prefixes bound by the XML spec itself, resolvable in every environment.
static WELL_KNOWN: phf::Map<&'static str, &'static str> = phf_map! {
    "xml" => "http://www.w3.org/XML/1998/namespace",
    "xmlns" => "http://www.w3.org/2000/xmlns/",
};

/// The reserved declaration prefix (`xmlns:p="uri"` / `xmlns="uri"`).
pub const XMLNS: &str = "xmlns";

/// Immutable prefix→URI environment.
///
/// The default (no-prefix) namespace is stored under the empty string.
/// Cloning is an `Arc` bump; [`NsEnv::merge`] with an empty delta returns a
/// shared handle without copying the map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NsEnv {
    bindings: Arc<BTreeMap<String, String>>,
}

impl NsEnv {
    /// Empty environment (only the well-known `xml`/`xmlns` prefixes resolve).
    pub fn new() -> Self {
        NsEnv::default()
    }

    /// Build an environment from `(prefix, uri)` pairs; later pairs win.
    pub fn from_bindings<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        NsEnv { bindings: Arc::new(bindings.into_iter().collect()) }
    }

    /// Resolve a prefix. The empty string is the default namespace.
    ///
    /// The reserved `xml` and `xmlns` prefixes resolve from a static table
    /// even when no environment declares them.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .get(prefix)
            .map(String::as_str)
            .or_else(|| WELL_KNOWN.get(prefix).copied())
    }

    /// Resolve the default namespace, if declared.
    pub fn default_uri(&self) -> Option<&str> {
        self.get("")
    }

    /// Derive a child environment: `delta` bindings shadow, the rest inherit.
    ///
    /// Duplicate prefixes within `delta` keep the last occurrence. An empty
    /// delta shares the parent map instead of copying it.
    pub fn merge(&self, delta: &[(String, String)]) -> NsEnv {
        if delta.is_empty() {
            return self.clone();
        }
        let mut merged = (*self.bindings).clone();
        for (prefix, uri) in delta {
            merged.insert(prefix.clone(), uri.clone());
        }
        NsEnv { bindings: Arc::new(merged) }
    }

    /// Iterate over explicit bindings (well-known prefixes excluded).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Number of explicit bindings.
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check whether no explicit bindings exist.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Partition an attribute list into xmlns declarations and ordinary attrs.
///
/// Every input attribute lands in exactly one half:
/// - `xmlns:p="uri"` becomes the delta pair `("p", "uri")`
/// - bare `xmlns="uri"` becomes `("", "uri")` (default namespace)
/// - everything else is returned verbatim, in order
///
/// Duplicate declarations are not an error; the delta preserves order so a
/// later [`NsEnv::merge`] applies last-write-wins.
pub fn split_ns_attrs(attrs: &[Attr]) -> (Vec<(String, String)>, Vec<Attr>) {
    let mut delta = Vec::new();
    let mut ordinary = Vec::new();

    for attr in attrs {
        match attr.name.prefix() {
            Some(XMLNS) => delta.push((attr.name.local().to_owned(), attr.value.clone())),
            None if attr.name.local() == XMLNS => {
                delta.push((String::new(), attr.value.clone()))
            }
            _ => ordinary.push(attr.clone()),
        }
    }

    (delta, ordinary)
}
