//! Outline-level Java syntax for symbol resolution.
//!
//! The parser recovers package, imports, type declarations with their type
//! parameters and supertypes, and member signatures. Method bodies and field
//! initializers are skipped; the resolver never looks inside them.

mod java;

use std::fmt;

pub use java::{ast, parse, parse_type_ref, Parse};

/// A byte-span into a source string.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}
