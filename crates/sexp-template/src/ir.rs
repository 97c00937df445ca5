/*
 * ir.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template intermediate representation.
//!
//! A [`Node`]'s meaning depends on where it sits:
//!
//! - In *element* position (the template root, or a child of
//!   [`Node::Sequence`]) a node produces exactly one value.
//! - In *contribution* position (a part of [`Node::Splice`]) a node
//!   produces a sequence whose items are flattened into the result.
//!
//! The builder produces un-optimized trees in which a `Splice` may have
//! any number of parts. After [`optimize`](crate::optimizer::optimize) a
//! `Splice` always has two or more parts and no `Sequence` consists only
//! of literals.

/// A fully known value that needs no evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// A symbol.
    Symbol(String),
    /// A nested sequence of literals.
    List(Vec<Literal>),
}

impl Literal {
    /// The empty sequence `()`.
    pub fn empty() -> Self {
        Literal::List(Vec::new())
    }

    /// Create a symbol literal.
    pub fn symbol(name: impl Into<String>) -> Self {
        Literal::Symbol(name.into())
    }
}

/// A hole to be filled by the host's expression evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Eval {
    /// Raw host-expression text, passed to the evaluator verbatim.
    pub expr: String,
    /// Set for `,@` holes: the value is a sequence to flatten, not an element.
    pub splice: bool,
}

impl Eval {
    /// An unquote hole.
    pub fn value(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            splice: false,
        }
    }

    /// An unquote-splice hole.
    pub fn splice(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            splice: true,
        }
    }
}

/// A node in the template IR.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A literal value.
    Literal(Literal),

    /// A hole evaluated against the caller's environment.
    Eval(Eval),

    /// One value per child, in order.
    Sequence(Vec<Node>),

    /// Each part yields a sequence; the sequences are concatenated.
    Splice(Vec<Node>),
}

impl Node {
    /// Shorthand for a symbol literal node.
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Literal(Literal::symbol(name))
    }

    /// True if this node is a [`Node::Literal`].
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// Short name of the node kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Literal(_) => "literal",
            Node::Eval(Eval { splice: false, .. }) => "eval",
            Node::Eval(Eval { splice: true, .. }) => "eval-splice",
            Node::Sequence(_) => "sequence",
            Node::Splice(_) => "splice",
        }
    }
}
