/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compiled templates.

use crate::builder::build_top_level;
use crate::error::TemplateResult;
use crate::ir::Node;
use crate::optimizer::optimize;
use crate::parser::{ParseOptions, Parser};

/// A parsed, built and optimized template, ready for evaluation.
///
/// Templates are immutable; one template can be evaluated any number of
/// times, from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// The optimized IR.
    pub(crate) root: Node,

    /// Original source text.
    pub(crate) source: String,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// # Arguments
    /// * `source` - Template text containing exactly one sexp
    ///
    /// # Returns
    /// The compiled template, or a parse error.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        Self::compile_with_options(source, ParseOptions::default())
    }

    /// Compile a template with explicit parser options.
    pub fn compile_with_options(source: &str, options: ParseOptions) -> TemplateResult<Self> {
        let term = Parser::with_options(source, options).parse_one()?;
        let root = optimize(build_top_level(&term)?);
        tracing::debug!(
            source_len = source.len(),
            root = root.kind(),
            "Compiled template"
        );
        Ok(Template {
            root,
            source: source.to_string(),
        })
    }

    /// The optimized IR root.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The source text this template was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True if the template contains no holes.
    pub fn is_literal(&self) -> bool {
        self.root.is_literal()
    }
}

/// Parse and optimize a template.
pub fn parse_template(source: &str) -> TemplateResult<Template> {
    Template::compile(source)
}

/// Parse and optimize a template with explicit parser options.
pub fn parse_template_with_options(
    source: &str,
    options: ParseOptions,
) -> TemplateResult<Template> {
    Template::compile_with_options(source, options)
}
