/*
 * bindings.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Name-lookup host for template holes.
//!
//! [`BindingsEvaluator`] treats the text of each hole as a dotted path
//! (`name` or `employee.salary`) and resolves it against two [`Scope`]s.
//! Locals shadow globals. Embedders that need real expression languages
//! implement [`ExprEvaluator`] themselves.

use std::collections::HashMap;

use thiserror::Error;

use crate::evaluator::{Environment, ExprEvaluator};

/// A host value that holes can produce.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Get a nested field by path.
    ///
    /// For example, `get_path(&["employee", "salary"])` on a Map containing
    /// `{"employee": {"salary": 50000}}` returns the salary value.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        match self {
            Value::Map(m) => m.get(*first).and_then(|v| v.get_path(rest)),
            _ => None,
        }
    }

    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Str(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A set of named bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    variables: HashMap<String, Value>,
}

impl Scope {
    /// Create a new empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name, replacing any previous binding.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    /// Build a scope from a JSON object; anything else yields an empty scope.
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Map(variables) => Self { variables },
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Errors raised by [`BindingsEvaluator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No binding for the path.
    #[error("name '{name}' is not defined")]
    Undefined { name: String },

    /// A `,@` hole produced something other than a list.
    #[error("'{found}' object is not iterable")]
    NotIterable { found: &'static str },
}

/// Resolves hole text as a dotted path into locals, then globals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingsEvaluator;

impl ExprEvaluator for BindingsEvaluator {
    type Globals = Scope;
    type Locals = Scope;
    type Value = Value;
    type Error = LookupError;

    fn eval(&self, env: Environment<'_, Scope, Scope>, expr: &str) -> Result<Value, LookupError> {
        let undefined = || LookupError::Undefined {
            name: expr.to_string(),
        };
        let path: Vec<&str> = expr.trim().split('.').collect();
        let (first, rest) = path.split_first().ok_or_else(undefined)?;

        env.locals
            .get(first)
            .or_else(|| env.globals.get(first))
            .and_then(|value| value.get_path(rest))
            .cloned()
            .ok_or_else(undefined)
    }

    fn splice(&self, value: Value) -> Result<Vec<Value>, LookupError> {
        match value {
            Value::List(items) => Ok(items),
            other => Err(LookupError::NotIterable {
                found: other.type_name(),
            }),
        }
    }
}
