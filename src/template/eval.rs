use super::parser::{Expr, Node};
use super::{Context, TemplateError};
use serde_json::Value;
use std::cmp::Ordering;

pub(crate) fn render_nodes(nodes: &[Node], ctx: &Context<'_>, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Action(expr) => out.push_str(&to_text(&evaluate(expr, ctx)?)),
            Node::If { branches, otherwise } => {
                let mut taken = false;
                for (condition, body) in branches {
                    if truthy(&evaluate(condition, ctx)?) {
                        render_nodes(body, ctx, out)?;
                        taken = true;
                        break;
                    }
                }
                if !taken {
                    render_nodes(otherwise, ctx, out)?;
                }
            }
        }
    }
    Ok(())
}

fn evaluate(expr: &Expr, ctx: &Context<'_>) -> Result<Value, TemplateError> {
    match expr {
        Expr::Field(path) => ctx.lookup(path),
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Call(name, args) => call(name, args, ctx),
    }
}

fn call(name: &str, args: &[Expr], ctx: &Context<'_>) -> Result<Value, TemplateError> {
    match name {
        // and/or evaluate lazily and return the deciding operand
        "and" | "or" => {
            if args.is_empty() {
                return Err(TemplateError::BadArguments(name.to_string()));
            }
            let mut last = Value::Null;
            for arg in args {
                last = evaluate(arg, ctx)?;
                if truthy(&last) == (name == "or") {
                    break;
                }
            }
            Ok(last)
        }
        _ => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            apply(name, &values)
        }
    }
}

fn apply(name: &str, args: &[Value]) -> Result<Value, TemplateError> {
    let bad = || TemplateError::BadArguments(name.to_string());

    match name {
        "not" => match args {
            [value] => Ok(Value::Bool(!truthy(value))),
            _ => Err(bad()),
        },
        "eq" => match args {
            [first, rest @ ..] if !rest.is_empty() => {
                Ok(Value::Bool(rest.iter().any(|other| equal(first, other))))
            }
            _ => Err(bad()),
        },
        "ne" => match args {
            [a, b] => Ok(Value::Bool(!equal(a, b))),
            _ => Err(bad()),
        },
        "lt" | "le" | "gt" | "ge" => match args {
            [a, b] => {
                let ordering = compare(a, b).ok_or_else(bad)?;
                Ok(Value::Bool(match name {
                    "lt" => ordering == Ordering::Less,
                    "le" => ordering != Ordering::Greater,
                    "gt" => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }))
            }
            _ => Err(bad()),
        },
        "trim" | "upper" | "lower" => match args {
            [value] => {
                let text = to_text(value);
                Ok(Value::String(match name {
                    "trim" => text.trim().to_string(),
                    "upper" => text.to_uppercase(),
                    _ => text.to_lowercase(),
                }))
            }
            _ => Err(bad()),
        },
        "contains" => match args {
            [substr, text] => Ok(Value::Bool(to_text(text).contains(&to_text(substr)))),
            _ => Err(bad()),
        },
        _ => Err(TemplateError::UnknownFunction(name.to_string())),
    }
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(false, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub(crate) fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
