/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Quasiquote templates over s-expressions.
//!
//! A template is literal s-expression text with holes:
//!
//! - `,expr` is replaced by the value of `expr`
//! - `,@expr` evaluates `expr` to a sequence and splices its items into
//!   the enclosing group
//!
//! The text after a hole marker is opaque to this crate. It is resolved
//! by an [`ExprEvaluator`] supplied by the embedder; [`BindingsEvaluator`]
//! is a ready-made one that looks names up in two [`Scope`]s.
//!
//! # Pipeline
//!
//! source text → [`parser`] → [`Term`] → [`builder`] → [`Node`] →
//! [`optimizer`] → [`Template`] → [`Template::evaluate`] → [`Datum`]
//!
//! # Example
//!
//! ```
//! use sexp_template::{compile_template, BindingsEvaluator, Datum, Scope, Value};
//!
//! let render = compile_template("(a ,@b c)", BindingsEvaluator)?;
//!
//! let mut locals = Scope::new();
//! locals.insert("b", vec![Value::Int(1), Value::Int(2)]);
//!
//! let result = render(&Scope::new(), &locals).unwrap();
//! assert_eq!(
//!     result,
//!     Datum::List(vec![
//!         Datum::symbol("a"),
//!         Datum::Value(Value::Int(1)),
//!         Datum::Value(Value::Int(2)),
//!         Datum::symbol("c"),
//!     ])
//! );
//! # Ok::<(), sexp_template::TemplateError>(())
//! ```

pub mod bindings;
pub mod builder;
pub mod cache;
pub mod error;
pub mod evaluator;
pub mod ir;
pub mod optimizer;
pub mod parser;
pub mod template;
pub mod term;

// Re-export main types at crate root
pub use bindings::{BindingsEvaluator, LookupError, Scope, Value};
pub use builder::{build, build_top_level};
pub use cache::{TemplateCache, global_cache};
pub use error::{TemplateError, TemplateResult};
pub use evaluator::{CompiledTemplate, Datum, Environment, ExprEvaluator, compile_template};
pub use ir::{Eval, Literal, Node};
pub use optimizer::optimize;
pub use parser::{ParseOptions, Parser, parse_all, parse_one};
pub use template::{Template, parse_template, parse_template_with_options};
pub use term::{HoleKind, Term};
