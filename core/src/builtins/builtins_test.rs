//! Tests for the default builtin registry.

use crate::{
    builtins::{BUILTINS, lookup},
    values::{NULL, Value},
};
use pretty_assertions::assert_eq;

fn call(name: &str, args: &[Value]) -> Value {
    let (_, builtin) = lookup(name).unwrap_or_else(|| panic!("no builtin named {}", name));
    builtin.call(args)
}

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::Integer).collect())
}

#[test]
fn test_registry_order() {
    let names: Vec<_> = BUILTINS.iter().map(|b| b.name).collect();
    assert_eq!(names, vec!["len", "puts", "first", "last", "rest", "push"]);
    assert_eq!(lookup("first").map(|(i, _)| i), Some(2));
    assert!(lookup("print").is_none());
}

#[test]
fn test_len() {
    assert_eq!(call("len", &[Value::from("")]), Value::Integer(0));
    assert_eq!(call("len", &[Value::from("four")]), Value::Integer(4));
    assert_eq!(call("len", &[ints(&[1, 2, 3])]), Value::Integer(3));
    assert_eq!(
        call("len", &[Value::Integer(1)]),
        Value::error("argument to `len` not supported, got INTEGER")
    );
    assert_eq!(
        call("len", &[Value::from("one"), Value::from("two")]),
        Value::error("wrong number of arguments. got=2, want=1")
    );
}

#[test]
fn test_first_and_last() {
    assert_eq!(call("first", &[ints(&[1, 2, 3])]), Value::Integer(1));
    assert_eq!(call("last", &[ints(&[1, 2, 3])]), Value::Integer(3));
    assert_eq!(call("first", &[ints(&[])]), NULL);
    assert_eq!(call("last", &[ints(&[])]), NULL);
    assert_eq!(
        call("first", &[Value::Integer(1)]),
        Value::error("argument to `first` must be ARRAY, got INTEGER")
    );
    assert_eq!(
        call("last", &[]),
        Value::error("wrong number of arguments. got=0, want=1")
    );
}

#[test]
fn test_rest() {
    assert_eq!(call("rest", &[ints(&[1, 2, 3])]), ints(&[2, 3]));
    assert_eq!(call("rest", &[ints(&[1])]), ints(&[]));
    assert_eq!(call("rest", &[ints(&[])]), NULL);
    assert_eq!(
        call("rest", &[Value::from("abc")]),
        Value::error("argument to `rest` must be ARRAY, got STRING")
    );
}

#[test]
fn test_push_returns_new_array() {
    let original = ints(&[1]);
    assert_eq!(
        call("push", &[original.clone(), Value::Integer(2)]),
        ints(&[1, 2])
    );
    assert_eq!(original, ints(&[1]));
    assert_eq!(call("push", &[ints(&[]), Value::Integer(1)]), ints(&[1]));
    assert_eq!(
        call("push", &[Value::Integer(1), Value::Integer(1)]),
        Value::error("argument to `push` must be ARRAY, got INTEGER")
    );
}

#[test]
fn test_puts_returns_null() {
    assert_eq!(call("puts", &[Value::from("hello"), Value::Integer(1)]), NULL);
    assert_eq!(call("puts", &[]), NULL);
}
