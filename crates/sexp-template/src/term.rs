/*
 * term.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Raw term tree produced by the parser.
//!
//! Terms mirror the template text one-to-one: symbols, parenthesized
//! groups, and hole markers carrying the unparsed host expression that
//! follows `,` or `,@`.

/// Which hole marker introduced a [`Term::Hole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoleKind {
    /// `,expr`: contributes one evaluated value.
    Unquote,
    /// `,@expr`: the evaluated sequence is flattened into the parent.
    UnquoteSplice,
}

impl HoleKind {
    /// The marker text as written in a template.
    pub fn marker(self) -> &'static str {
        match self {
            HoleKind::Unquote => ",",
            HoleKind::UnquoteSplice => ",@",
        }
    }
}

/// A node of the raw term tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A bare symbol: `[A-Za-z_][A-Za-z0-9_]*`.
    Symbol(String),

    /// A parenthesized group, possibly empty.
    List(Vec<Term>),

    /// A hole marker and the raw host-expression text that follows it.
    Hole(HoleKind, String),
}

impl Term {
    /// Create a symbol term.
    pub fn symbol(name: impl Into<String>) -> Self {
        Term::Symbol(name.into())
    }

    /// Create an unquote hole.
    pub fn unquote(expr: impl Into<String>) -> Self {
        Term::Hole(HoleKind::Unquote, expr.into())
    }

    /// Create an unquote-splice hole.
    pub fn unquote_splice(expr: impl Into<String>) -> Self {
        Term::Hole(HoleKind::UnquoteSplice, expr.into())
    }

    /// True if the term (recursively) contains no holes.
    pub fn is_literal(&self) -> bool {
        match self {
            Term::Symbol(_) => true,
            Term::List(items) => items.iter().all(Term::is_literal),
            Term::Hole(..) => false,
        }
    }
}
