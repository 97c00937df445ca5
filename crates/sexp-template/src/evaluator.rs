/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Evaluation walks the optimized IR left to right. Holes are handed to
//! an injected [`ExprEvaluator`]; its errors propagate to the caller
//! unchanged and abort the evaluation.

use std::sync::Arc;

use crate::cache::global_cache;
use crate::error::TemplateResult;
use crate::ir::{Eval, Literal, Node};
use crate::template::Template;

/// The `(globals, locals)` pair a template is evaluated against.
///
/// The template engine never looks inside; both halves are passed to the
/// [`ExprEvaluator`] as-is.
#[derive(Debug)]
pub struct Environment<'a, G, L> {
    pub globals: &'a G,
    pub locals: &'a L,
}

impl<'a, G, L> Environment<'a, G, L> {
    pub fn new(globals: &'a G, locals: &'a L) -> Self {
        Self { globals, locals }
    }
}

impl<G, L> Clone for Environment<'_, G, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G, L> Copy for Environment<'_, G, L> {}

/// Host capability that resolves hole expressions.
pub trait ExprEvaluator {
    /// Global bindings.
    type Globals;
    /// Local bindings.
    type Locals;
    /// Values produced by holes.
    type Value;
    /// Failure raised while resolving a hole.
    type Error;

    /// Evaluate the raw text of a hole.
    fn eval(
        &self,
        env: Environment<'_, Self::Globals, Self::Locals>,
        expr: &str,
    ) -> Result<Self::Value, Self::Error>;

    /// Turn the value of a `,@` hole into the items to splice.
    ///
    /// Values that cannot be iterated must be reported as an error.
    fn splice(&self, value: Self::Value) -> Result<Vec<Self::Value>, Self::Error>;
}

/// The result of evaluating a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum<V> {
    /// A literal symbol from the template text.
    Symbol(String),
    /// A value produced by a hole.
    Value(V),
    /// A sequence.
    List(Vec<Datum<V>>),
}

impl<V> Datum<V> {
    pub fn symbol(name: impl Into<String>) -> Self {
        Datum::Symbol(name.into())
    }

    /// The items of a list, or `None` for symbols and values.
    pub fn as_list(&self) -> Option<&[Datum<V>]> {
        match self {
            Datum::List(items) => Some(items),
            _ => None,
        }
    }
}

impl<V> From<&Literal> for Datum<V> {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Symbol(name) => Datum::Symbol(name.clone()),
            Literal::List(items) => Datum::List(items.iter().map(Datum::from).collect()),
        }
    }
}

impl Template {
    /// Evaluate this template against an environment.
    ///
    /// # Arguments
    /// * `evaluator` - Resolves the template's holes
    /// * `env` - Bindings handed through to `evaluator`
    ///
    /// # Returns
    /// The nested result, or the first error raised by `evaluator`.
    pub fn evaluate<E: ExprEvaluator>(
        &self,
        evaluator: &E,
        env: Environment<'_, E::Globals, E::Locals>,
    ) -> Result<Datum<E::Value>, E::Error> {
        Evaluation { evaluator, env }.element(&self.root)
    }
}

struct Evaluation<'a, E: ExprEvaluator> {
    evaluator: &'a E,
    env: Environment<'a, E::Globals, E::Locals>,
}

impl<E: ExprEvaluator> Evaluation<'_, E> {
    /// Evaluate a node that produces one value.
    fn element(&self, node: &Node) -> Result<Datum<E::Value>, E::Error> {
        match node {
            Node::Literal(literal) => Ok(Datum::from(literal)),
            Node::Eval(Eval {
                expr,
                splice: false,
            }) => Ok(Datum::Value(self.evaluator.eval(self.env, expr)?)),
            Node::Eval(Eval { splice: true, .. }) | Node::Splice(_) => {
                let mut items = Vec::new();
                self.contribute(node, &mut items)?;
                Ok(Datum::List(items))
            }
            Node::Sequence(children) => children
                .iter()
                .map(|child| self.element(child))
                .collect::<Result<Vec<_>, _>>()
                .map(Datum::List),
        }
    }

    /// Evaluate a splice part, appending the items it yields to `out`.
    fn contribute(&self, node: &Node, out: &mut Vec<Datum<E::Value>>) -> Result<(), E::Error> {
        match node {
            Node::Literal(Literal::List(items)) => {
                out.extend(items.iter().map(Datum::from));
            }
            Node::Sequence(children) => {
                for child in children {
                    out.push(self.element(child)?);
                }
            }
            Node::Eval(Eval { expr, splice: true }) => {
                let value = self.evaluator.eval(self.env, expr)?;
                out.extend(self.evaluator.splice(value)?.into_iter().map(Datum::Value));
            }
            Node::Splice(parts) => {
                for part in parts {
                    self.contribute(part, out)?;
                }
            }
            Node::Literal(Literal::Symbol(_)) | Node::Eval(Eval { splice: false, .. }) => {
                unreachable!("{} node used as a splice part", node.kind())
            }
        }
        Ok(())
    }
}

/// A template bound to the evaluator that fills its holes.
#[derive(Debug, Clone)]
pub struct CompiledTemplate<E> {
    template: Arc<Template>,
    evaluator: E,
}

impl<E: ExprEvaluator> CompiledTemplate<E> {
    pub fn new(template: Arc<Template>, evaluator: E) -> Self {
        Self {
            template,
            evaluator,
        }
    }

    /// Evaluate the template against `(globals, locals)`.
    pub fn call(
        &self,
        globals: &E::Globals,
        locals: &E::Locals,
    ) -> Result<Datum<E::Value>, E::Error> {
        self.template
            .evaluate(&self.evaluator, Environment::new(globals, locals))
    }

    pub fn template(&self) -> &Template {
        &self.template
    }
}

/// Compile `source` into a function of `(globals, locals)`.
///
/// The parsed template comes from the process-wide cache, so compiling
/// the same text again skips parsing.
pub fn compile_template<E: ExprEvaluator>(
    source: &str,
    evaluator: E,
) -> TemplateResult<impl Fn(&E::Globals, &E::Locals) -> Result<Datum<E::Value>, E::Error> + use<E>>
{
    let compiled = CompiledTemplate::new(global_cache().get_or_compile(source)?, evaluator);
    Ok(move |globals: &E::Globals, locals: &E::Locals| compiled.call(globals, locals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse_template;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;

    type Vars = HashMap<String, Vec<i64>>;

    /// Looks names up in locals then globals and records every call.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl ExprEvaluator for Recorder {
        type Globals = Vars;
        type Locals = Vars;
        type Value = Vec<i64>;
        type Error = String;

        fn eval(&self, env: Environment<'_, Vars, Vars>, expr: &str) -> Result<Vec<i64>, String> {
            self.calls.borrow_mut().push(expr.to_string());
            env.locals
                .get(expr)
                .or_else(|| env.globals.get(expr))
                .cloned()
                .ok_or_else(|| format!("name '{expr}' is not defined"))
        }

        fn splice(&self, value: Vec<i64>) -> Result<Vec<Vec<i64>>, String> {
            Ok(value.into_iter().map(|n| vec![n]).collect())
        }
    }

    fn vars(entries: &[(&str, Vec<i64>)]) -> Vars {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn run(source: &str, locals: &Vars) -> Result<Datum<Vec<i64>>, String> {
        let globals = Vars::new();
        parse_template(source)
            .unwrap()
            .evaluate(&Recorder::default(), Environment::new(&globals, locals))
    }

    fn sym(s: &str) -> Datum<Vec<i64>> {
        Datum::symbol(s)
    }

    #[test]
    fn test_literal_template() {
        assert_eq!(run("a", &Vars::new()), Ok(sym("a")));
        assert_eq!(
            run("(a (b) ())", &Vars::new()),
            Ok(Datum::List(vec![
                sym("a"),
                Datum::List(vec![sym("b")]),
                Datum::List(vec![]),
            ]))
        );
    }

    #[test]
    fn test_unquote() {
        let locals = vars(&[("a", vec![5])]);
        assert_eq!(
            run("(x ,a)", &locals),
            Ok(Datum::List(vec![sym("x"), Datum::Value(vec![5])]))
        );
        assert_eq!(run(",a", &locals), Ok(Datum::Value(vec![5])));
    }

    #[test]
    fn test_splice_flattens() {
        let locals = vars(&[("b", vec![1, 2, 3])]);
        assert_eq!(
            run("(a ,@b c)", &locals),
            Ok(Datum::List(vec![
                sym("a"),
                Datum::Value(vec![1]),
                Datum::Value(vec![2]),
                Datum::Value(vec![3]),
                sym("c"),
            ]))
        );
    }

    #[test]
    fn test_single_splice_group_is_a_list() {
        let locals = vars(&[("b", vec![1, 2])]);
        let expected = Datum::List(vec![Datum::Value(vec![1]), Datum::Value(vec![2])]);
        assert_eq!(run("(,@b)", &locals), Ok(expected.clone()));
        assert_eq!(
            run("((,@b) c)", &locals),
            Ok(Datum::List(vec![expected, sym("c")]))
        );
    }

    #[test]
    fn test_empty_splice() {
        let locals = vars(&[("e", vec![])]);
        assert_eq!(
            run("(a ,@e)", &locals),
            Ok(Datum::List(vec![sym("a")]))
        );
    }

    #[test]
    fn test_error_propagates_unchanged() {
        assert_eq!(
            run("(a ,missing)", &Vars::new()),
            Err("name 'missing' is not defined".to_string())
        );
    }

    #[test]
    fn test_left_to_right_and_stops_at_first_error() {
        let recorder = Recorder::default();
        let globals = Vars::new();
        let locals = vars(&[("a", vec![1]), ("c", vec![3])]);
        let template = parse_template("(,a ,@c ,b ,c)").unwrap();

        let result = template.evaluate(&recorder, Environment::new(&globals, &locals));

        assert_eq!(result, Err("name 'b' is not defined".to_string()));
        assert_eq!(*recorder.calls.borrow(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_each_evaluation_is_fresh() {
        let recorder = Recorder::default();
        let globals = Vars::new();
        let template = parse_template("(,a ,a)").unwrap();

        let one = vars(&[("a", vec![1])]);
        let two = vars(&[("a", vec![2])]);
        let first = template.evaluate(&recorder, Environment::new(&globals, &one));
        let second = template.evaluate(&recorder, Environment::new(&globals, &two));

        assert_eq!(
            first,
            Ok(Datum::List(vec![Datum::Value(vec![1]), Datum::Value(vec![1])]))
        );
        assert_eq!(
            second,
            Ok(Datum::List(vec![Datum::Value(vec![2]), Datum::Value(vec![2])]))
        );
        assert_eq!(recorder.calls.borrow().len(), 4);
    }

    #[test]
    fn test_globals_and_locals() {
        let compiled = CompiledTemplate::new(
            Arc::new(parse_template("(,g ,l)").unwrap()),
            Recorder::default(),
        );
        let globals = vars(&[("g", vec![100]), ("l", vec![0])]);
        let locals = vars(&[("l", vec![7])]);
        assert_eq!(
            compiled.call(&globals, &locals),
            Ok(Datum::List(vec![Datum::Value(vec![100]), Datum::Value(vec![7])]))
        );
    }

    #[test]
    fn test_compile_template_closure() {
        let render = compile_template("(x ,a)", Recorder::default()).unwrap();
        let globals = Vars::new();
        assert_eq!(
            render(&globals, &vars(&[("a", vec![5])])),
            Ok(Datum::List(vec![sym("x"), Datum::Value(vec![5])]))
        );
        assert_eq!(
            render(&globals, &vars(&[("a", vec![6])])),
            Ok(Datum::List(vec![sym("x"), Datum::Value(vec![6])]))
        );
    }

    #[test]
    fn test_datum_as_list() {
        let list: Datum<()> = Datum::List(vec![Datum::symbol("a")]);
        assert_eq!(list.as_list().map(<[_]>::len), Some(1));
        assert!(Datum::<()>::symbol("a").as_list().is_none());
    }
}
