use crate::{
    format,
    values::{NULL, Value},
};

use super::check_arity;

pub(super) fn len(args: &[Value]) -> Value {
    if let Err(err) = check_arity(args, 1) {
        return err;
    }
    match &args[0] {
        Value::Str(s) => Value::Integer(s.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        other => Value::error(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    }
}

pub(super) fn first(args: &[Value]) -> Value {
    match array_arg("first", args) {
        Ok(elements) => elements.first().cloned().unwrap_or(NULL),
        Err(err) => err,
    }
}

pub(super) fn last(args: &[Value]) -> Value {
    match array_arg("last", args) {
        Ok(elements) => elements.last().cloned().unwrap_or(NULL),
        Err(err) => err,
    }
}

/// Everything but the first element, as a new array. Null for an empty array.
pub(super) fn rest(args: &[Value]) -> Value {
    match array_arg("rest", args) {
        Ok([]) => NULL,
        Ok([_, tail @ ..]) => Value::array(tail.to_vec()),
        Err(err) => err,
    }
}

/// Returns a new array; the argument is left untouched.
pub(super) fn push(args: &[Value]) -> Value {
    if let Err(err) = check_arity(args, 2) {
        return err;
    }
    let Value::Array(elements) = &args[0] else {
        return must_be_array("push", &args[0]);
    };
    let mut pushed = elements.to_vec();
    pushed.push(args[1].clone());
    Value::array(pushed)
}

fn array_arg<'a>(name: &str, args: &'a [Value]) -> Result<&'a [Value], Value> {
    check_arity(args, 1)?;
    args[0]
        .as_array()
        .ok_or_else(|| must_be_array(name, &args[0]))
}

fn must_be_array(name: &str, got: &Value) -> Value {
    Value::error(format!(
        "argument to `{}` must be ARRAY, got {}",
        name,
        got.type_name()
    ))
}
