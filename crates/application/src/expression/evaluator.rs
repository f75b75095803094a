//! Evaluation of parsed expression nodes against a map of string values.

use std::collections::HashMap;

use super::ExpressionError;
use super::parser::{Expr, Func, Node};

/// A runtime value: every field is a string, comparisons produce booleans.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value<'a> {
    Str(&'a str),
    Bool(bool),
}

impl Value<'_> {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Str(s) => out.push_str(s),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        }
    }
}

pub(crate) fn render_nodes(
    nodes: &[Node],
    values: &HashMap<String, String>,
    out: &mut String,
) -> Result<(), ExpressionError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Output(expr) => evaluate(expr, values)?.write_to(out),
            Node::If {
                branches,
                otherwise,
            } => {
                let mut taken = false;
                for (condition, body) in branches {
                    if evaluate(condition, values)?.is_truthy() {
                        render_nodes(body, values, out)?;
                        taken = true;
                        break;
                    }
                }
                if !taken {
                    render_nodes(otherwise, values, out)?;
                }
            }
        }
    }
    Ok(())
}

fn evaluate<'a>(
    expr: &'a Expr,
    values: &'a HashMap<String, String>,
) -> Result<Value<'a>, ExpressionError> {
    match expr {
        // A missing key reads as the empty string.
        Expr::Field(name) => Ok(Value::Str(values.get(name).map_or("", String::as_str))),
        Expr::Literal(text) => Ok(Value::Str(text)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Call {
            func,
            args,
            position,
        } => call(*func, args, *position, values),
    }
}

fn call<'a>(
    func: Func,
    args: &'a [Expr],
    position: usize,
    values: &'a HashMap<String, String>,
) -> Result<Value<'a>, ExpressionError> {
    match func {
        Func::Eq => {
            let [first, rest @ ..] = args else {
                return Err(arity(func, position, "at least two arguments"));
            };
            if rest.is_empty() {
                return Err(arity(func, position, "at least two arguments"));
            }
            let left = evaluate(first, values)?;
            for arg in rest {
                if equals(&left, &evaluate(arg, values)?, position)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Func::Ne => {
            let [left, right] = args else {
                return Err(arity(func, position, "exactly two arguments"));
            };
            let equal = equals(&evaluate(left, values)?, &evaluate(right, values)?, position)?;
            Ok(Value::Bool(!equal))
        }
        Func::Not => {
            let [arg] = args else {
                return Err(arity(func, position, "exactly one argument"));
            };
            Ok(Value::Bool(!evaluate(arg, values)?.is_truthy()))
        }
        Func::And | Func::Or => {
            if args.is_empty() {
                return Err(arity(func, position, "at least one argument"));
            }
            let stop_on = matches!(func, Func::Or);
            let mut last = Value::Bool(!stop_on);
            for arg in args {
                last = evaluate(arg, values)?;
                if last.is_truthy() == stop_on {
                    break;
                }
            }
            Ok(last)
        }
    }
}

fn equals(left: &Value<'_>, right: &Value<'_>, position: usize) -> Result<bool, ExpressionError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        _ => Err(ExpressionError::Render(format!(
            "incompatible types for comparison at byte {position}"
        ))),
    }
}

fn arity(func: Func, position: usize, expected: &str) -> ExpressionError {
    ExpressionError::Render(format!(
        "{} at byte {position} expects {expected}",
        func.name()
    ))
}
