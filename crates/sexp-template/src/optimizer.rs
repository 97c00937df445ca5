/*
 * optimizer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! IR simplification.
//!
//! Rewrites are applied bottom-up and always build fresh nodes:
//!
//! 1. A [`Node::Sequence`] whose children are all literals becomes a
//!    single [`Literal::List`].
//! 2. Adjacent literal-list and sequence parts of a [`Node::Splice`] are
//!    merged. Two literal lists concatenate; otherwise both sides are
//!    expanded to per-element nodes and joined into one `Sequence`.
//!    Splice-marked holes never merge with their neighbors.
//! 3. A `Splice` left with no parts becomes the empty literal `()`, and
//!    one left with a single part becomes that part.
//!
//! `optimize` is idempotent.

use crate::ir::{Literal, Node};

/// Optimize an IR tree.
pub fn optimize(node: Node) -> Node {
    match node {
        Node::Literal(_) | Node::Eval(_) => node,
        Node::Sequence(items) => {
            let items: Vec<Node> = items.into_iter().map(optimize).collect();
            collapse_sequence(items)
        }
        Node::Splice(parts) => {
            let parts = merge_parts(parts.into_iter().map(optimize).collect());
            collapse_splice(parts)
        }
    }
}

fn collapse_sequence(items: Vec<Node>) -> Node {
    if !items.iter().all(Node::is_literal) {
        return Node::Sequence(items);
    }
    let values = items
        .into_iter()
        .map(|item| match item {
            Node::Literal(value) => value,
            _ => unreachable!("checked above that every item is a literal"),
        })
        .collect();
    Node::Literal(Literal::List(values))
}

fn collapse_splice(mut parts: Vec<Node>) -> Node {
    if parts.len() > 1 {
        return Node::Splice(parts);
    }
    match parts.pop() {
        None => {
            tracing::trace!("empty splice collapsed to ()");
            Node::Literal(Literal::empty())
        }
        Some(part) => {
            tracing::trace!(part = part.kind(), "single-part splice collapsed");
            part
        }
    }
}

/// A splice part that can be merged with an adjacent one.
fn is_mergeable(part: &Node) -> bool {
    matches!(part, Node::Literal(Literal::List(_)) | Node::Sequence(_))
}

fn merge_parts(parts: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(parts.len());
    for part in parts {
        match merged.pop() {
            Some(prev) if is_mergeable(&prev) && is_mergeable(&part) => {
                merged.push(merge_pair(prev, part));
            }
            Some(prev) => {
                merged.push(prev);
                merged.push(part);
            }
            None => merged.push(part),
        }
    }
    merged
}

fn merge_pair(left: Node, right: Node) -> Node {
    match (left, right) {
        (Node::Literal(Literal::List(mut left)), Node::Literal(Literal::List(right))) => {
            left.extend(right);
            Node::Literal(Literal::List(left))
        }
        (left, right) => {
            let mut items = into_elements(left);
            items.extend(into_elements(right));
            Node::Sequence(items)
        }
    }
}

/// Expand a mergeable part into the element nodes it contributes.
fn into_elements(part: Node) -> Vec<Node> {
    match part {
        Node::Literal(Literal::List(values)) => values.into_iter().map(Node::Literal).collect(),
        Node::Sequence(items) => items,
        other => unreachable!("{} part is not mergeable", other.kind()),
    }
}
