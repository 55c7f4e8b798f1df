//! Facets: named, unevaluated expressions attached to declarations.
//!
//! The assembler never evaluates facet expressions. It only reads literal
//! labels (e.g. the name given to `parent:`) and moves expressions between
//! descriptions, so an [`Expression`] is simply the source text handed over
//! by the parser.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// An unevaluated expression descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression {
    text: String,
}

impl Expression {
    /// Creates an expression from its source text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The literal text of the expression.
    pub fn label(&self) -> &str {
        &self.text
    }

    /// Whether the expression is the literal `true`.
    pub fn is_true(&self) -> bool {
        self.text.trim() == "true"
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// An insertion-ordered mapping of facet name to expression.
///
/// Inserting a facet that already exists replaces its expression in place,
/// keeping its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facets(IndexMap<Id, Expression>);

impl Facets {
    /// Creates an empty facet set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expression of facet `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.0.get(&Id::new(key))
    }

    /// Returns the literal label of facet `key`, if present.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(Expression::label)
    }

    /// Whether facet `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&Id::new(key))
    }

    /// Whether facet `key` is present and its expression is the literal `true`.
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key).is_some_and(Expression::is_true)
    }

    /// Sets facet `key`, returning the previous expression.
    pub fn insert(&mut self, key: &str, expression: impl Into<Expression>) -> Option<Expression> {
        self.0.insert(Id::new(key), expression.into())
    }

    /// Removes facet `key`, preserving the order of the remaining facets.
    pub fn remove(&mut self, key: &str) -> Option<Expression> {
        self.0.shift_remove(&Id::new(key))
    }

    /// Copies every facet of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Facets) {
        for (key, expression) in &other.0 {
            self.0.insert(*key, expression.clone());
        }
    }

    /// Iterates over `(name, expression)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &Expression)> {
        self.0.iter().map(|(key, expression)| (*key, expression))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<Expression>> FromIterator<(K, V)> for Facets {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut facets = Facets::new();
        for (key, value) in iter {
            facets.insert(key.as_ref(), value);
        }
        facets
    }
}
