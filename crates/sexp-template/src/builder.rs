/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion from raw [`Term`]s to un-optimized IR.
//!
//! Every term is built in element position. A group whose children
//! include an unquote-splice becomes a [`Node::Splice`]: each maximal run
//! of ordinary children is wrapped in one [`Node::Sequence`] part and
//! each splice hole is a part of its own.

use crate::error::{TemplateError, TemplateResult};
use crate::ir::{Eval, Literal, Node};
use crate::term::{HoleKind, Term};

/// Build the IR for a single term, without optimizing it.
///
/// An unquote-splice hole builds to a splice-marked [`Eval`]; it is only
/// meaningful as a child of a group, which [`build_top_level`] enforces.
pub fn build(term: &Term) -> Node {
    match term {
        Term::Symbol(name) => Node::Literal(Literal::Symbol(name.clone())),
        Term::Hole(HoleKind::Unquote, expr) => Node::Eval(Eval::value(expr.clone())),
        Term::Hole(HoleKind::UnquoteSplice, expr) => Node::Eval(Eval::splice(expr.clone())),
        Term::List(items) => build_group(items),
    }
}

/// Build the IR for the whole template.
///
/// Fails if the template is a bare `,@expr`, which has nothing to
/// flatten into.
pub fn build_top_level(term: &Term) -> TemplateResult<Node> {
    match build(term) {
        Node::Eval(Eval { splice: true, .. }) => Err(TemplateError::parse(
            "splice only allowed inside a sequence",
            0,
        )),
        node => Ok(node),
    }
}

fn build_group(items: &[Term]) -> Node {
    let children: Vec<Node> = items.iter().map(build).collect();
    if !children.iter().any(is_splice_hole) {
        return Node::Sequence(children);
    }

    let mut parts = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if is_splice_hole(&child) {
            if !run.is_empty() {
                parts.push(Node::Sequence(std::mem::take(&mut run)));
            }
            parts.push(child);
        } else {
            run.push(child);
        }
    }
    if !run.is_empty() {
        parts.push(Node::Sequence(run));
    }
    Node::Splice(parts)
}

fn is_splice_hole(node: &Node) -> bool {
    matches!(node, Node::Eval(Eval { splice: true, .. }))
}
