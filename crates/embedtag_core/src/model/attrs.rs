//! Attribute bag with tag-scoped keys.
//!
//! # Responsibility
//! - Hold the named values destined for a generated object/embed pair.
//! - Parse the legacy `obj#` / `emb#` key prefixes into an explicit scope.
//!
//! # Invariants
//! - Iteration follows first-insertion order; re-inserting a key keeps its slot.
//! - A `None` value is stored but reads as absent.

use std::fmt::{Display, Formatter};

/// Tag an attribute key may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagScope {
    /// The ActiveX `<object>` tag and its nested `<param>` elements.
    Object,
    /// The plugin `<embed>` tag.
    Embed,
}

impl TagScope {
    /// Legacy textual prefix for keys restricted to this tag.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Object => "obj#",
            Self::Embed => "emb#",
        }
    }

    /// The scope of the opposite tag.
    pub fn other(self) -> Self {
        match self {
            Self::Object => Self::Embed,
            Self::Embed => Self::Object,
        }
    }
}

/// Attribute key: a bare name plus an optional tag restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrKey {
    pub name: String,
    pub scope: Option<TagScope>,
}

impl AttrKey {
    /// Key that applies to both tags.
    pub fn shared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: None,
        }
    }

    /// Key restricted to one tag.
    pub fn scoped(name: impl Into<String>, scope: TagScope) -> Self {
        Self {
            name: name.into(),
            scope: Some(scope),
        }
    }

    /// Parses legacy `obj#name` / `emb#name` text; anything else is shared.
    pub fn parse(raw: &str) -> Self {
        for scope in [TagScope::Object, TagScope::Embed] {
            if let Some(name) = raw.strip_prefix(scope.prefix()) {
                return Self::scoped(name, scope);
            }
        }
        Self::shared(raw)
    }

    /// Same name, restricted to `scope`.
    pub fn with_scope(&self, scope: TagScope) -> Self {
        Self::scoped(self.name.clone(), scope)
    }
}

impl Display for AttrKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.scope {
            Some(scope) => write!(f, "{}{}", scope.prefix(), self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Insertion-ordered mapping from [`AttrKey`] to an optional value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    entries: Vec<(AttrKey, Option<String>)>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value in place.
    pub fn insert(&mut self, key: AttrKey, value: Option<String>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value for `key`; a stored `None` reads as absent.
    pub fn get(&self, key: &AttrKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Removes `name` in every scope.
    pub fn remove_name(&mut self, name: &str) {
        self.entries.retain(|(key, _)| key.name != name);
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key, value.as_deref()))
    }
}
