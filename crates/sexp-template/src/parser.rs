/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Hand-written recursive-descent parser for quasiquote template text.
//!
//! Grammar:
//!
//! ```text
//! sexp     := symbol | '(' sexp* ')' | ',' raw_expr | ',@' raw_expr
//! symbol   := [A-Za-z_][A-Za-z0-9_]*
//! raw_expr := characters scanned with bracket-depth tracking over
//!             ()[]{}; stops at whitespace or an unmatched close
//!             bracket while the depth is zero
//! ```
//!
//! A hole's operand is never parsed as sexp syntax: `,(a b)` carries the
//! raw text `(a b)` for the host to interpret.

use crate::error::{TemplateError, TemplateResult};
use crate::term::{HoleKind, Term};

/// Default for [`ParseOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of parenthesized groups.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse every top-level term in `source`.
pub fn parse_all(source: &str) -> TemplateResult<Vec<Term>> {
    Parser::new(source).parse_all()
}

/// Parse `source`, which must contain exactly one top-level term.
pub fn parse_one(source: &str) -> TemplateResult<Term> {
    Parser::new(source).parse_one()
}

/// Cursor over template source text.
#[derive(Debug)]
pub struct Parser<'a> {
    source: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
    depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Create a parser with default options.
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Create a parser with explicit options.
    pub fn with_options(source: &'a str, options: ParseOptions) -> Self {
        Self {
            source,
            pos: 0,
            depth: 0,
            options,
        }
    }

    /// Parse all remaining top-level terms.
    ///
    /// Fails on a `)` with no matching `(`.
    pub fn parse_all(&mut self) -> TemplateResult<Vec<Term>> {
        let mut terms = Vec::new();
        while let Some(term) = self.parse_sexp()? {
            terms.push(term);
        }
        self.expect_end()?;
        Ok(terms)
    }

    /// Parse exactly one top-level term.
    pub fn parse_one(&mut self) -> TemplateResult<Term> {
        let Some(first) = self.parse_sexp()? else {
            self.expect_end()?;
            return Err(TemplateError::parse(
                "template must contain exactly one sexp, found none",
                self.pos,
            ));
        };

        self.skip_whitespace();
        let second_at = self.pos;
        if self.parse_sexp()?.is_some() {
            return Err(TemplateError::parse(
                "template must contain exactly one sexp, found more than one",
                second_at,
            ));
        }
        self.expect_end()?;
        Ok(first)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Everything has been consumed, or the parser stopped on a stray `)`.
    fn expect_end(&self) -> TemplateResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(')') => Err(TemplateError::parse("Unmatched )", self.pos)),
            Some(_) => Err(TemplateError::parse(
                format!("Unrecognized input: {}", self.excerpt()),
                self.pos,
            )),
        }
    }

    fn excerpt(&self) -> String {
        self.rest().chars().take(20).collect()
    }

    /// Parse one sexp, or return `None` at end of input or before a `)`.
    fn parse_sexp(&mut self) -> TemplateResult<Option<Term>> {
        self.skip_whitespace();
        let rest = self.rest();

        if let Some(after) = rest.strip_prefix(",@") {
            self.pos = self.source.len() - after.len();
            let expr = self.parse_raw_expr()?;
            return Ok(Some(Term::Hole(HoleKind::UnquoteSplice, expr)));
        }
        if let Some(after) = rest.strip_prefix(',') {
            self.pos = self.source.len() - after.len();
            let expr = self.parse_raw_expr()?;
            return Ok(Some(Term::Hole(HoleKind::Unquote, expr)));
        }

        match self.peek() {
            None | Some(')') => Ok(None),
            Some('(') => self.parse_group().map(Some),
            Some(c) if is_symbol_start(c) => {
                let len = rest
                    .find(|c: char| !is_symbol_continue(c))
                    .unwrap_or(rest.len());
                self.pos += len;
                Ok(Some(Term::Symbol(rest[..len].to_string())))
            }
            Some(_) => Err(TemplateError::parse(
                format!("Unrecognized input: {}", self.excerpt()),
                self.pos,
            )),
        }
    }

    fn parse_group(&mut self) -> TemplateResult<Term> {
        let open_at = self.pos;
        if self.depth >= self.options.max_depth {
            return Err(TemplateError::NestingTooDeep {
                max_depth: self.options.max_depth,
                offset: open_at,
            });
        }
        self.pos += 1;
        self.depth += 1;

        let mut items = Vec::new();
        while let Some(item) = self.parse_sexp()? {
            items.push(item);
        }

        match self.peek() {
            Some(')') => {
                self.pos += 1;
                self.depth -= 1;
                Ok(Term::List(items))
            }
            // parse_sexp only stops early at end of input or before `)`
            _ => Err(TemplateError::parse("Unmatched (", open_at)),
        }
    }

    /// Scan the operand of a hole marker.
    fn parse_raw_expr(&mut self) -> TemplateResult<String> {
        let start = self.pos;
        let mut nesting: usize = 0;

        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() && nesting == 0 => break,
                '(' | '[' | '{' => nesting += 1,
                ')' | ']' | '}' => {
                    if nesting == 0 {
                        break;
                    }
                    nesting -= 1;
                }
                _ => {}
            }
            self.pos += c.len_utf8();
        }

        let expr = &self.source[start..self.pos];
        if nesting != 0 {
            return Err(TemplateError::parse(
                format!("Unterminated host expression {expr}"),
                start,
            ));
        }
        Ok(expr.to_string())
    }
}

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_symbol_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
