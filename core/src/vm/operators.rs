//! Operator semantics over runtime values.

use crate::{
    code::Opcode,
    values::{FALSE, NULL, TRUE, Value},
    vm::ErrorKind,
};

/// Evaluate `Add`, `Sub`, `Mul` or `Div`.
///
/// Integers use wrapping arithmetic; division truncates toward zero. Two
/// strings can only be added (concatenated).
pub(super) fn binary(op: Opcode, left: &Value, right: &Value) -> Result<Value, ErrorKind> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => binary_int(op, *l, *r).map(Value::Integer),
        (Value::Str(l), Value::Str(r)) if op == Opcode::Add => {
            let mut joined = l.clone();
            joined.push_str(r);
            Ok(Value::Str(joined))
        }
        _ => Err(unsupported(op, left, right)),
    }
}

fn binary_int(op: Opcode, left: i64, right: i64) -> Result<i64, ErrorKind> {
    match op {
        Opcode::Add => Ok(left.wrapping_add(right)),
        Opcode::Sub => Ok(left.wrapping_sub(right)),
        Opcode::Mul => Ok(left.wrapping_mul(right)),
        Opcode::Div if right == 0 => Err(ErrorKind::DivisionByZero),
        // wrapping_div covers i64::MIN / -1
        Opcode::Div => Ok(left.wrapping_div(right)),
        _ => Err(ErrorKind::UnsupportedOperandTypes {
            op,
            left: "INTEGER",
            right: "INTEGER",
        }),
    }
}

/// Evaluate `Equal`, `NotEqual` or `GreaterThan`.
///
/// Only integers are ordered. Equality works on any pair of values.
pub(super) fn compare(op: Opcode, left: &Value, right: &Value) -> Result<Value, ErrorKind> {
    let result = match (op, left, right) {
        (Opcode::GreaterThan, Value::Integer(l), Value::Integer(r)) => l > r,
        (Opcode::Equal, _, _) => left == right,
        (Opcode::NotEqual, _, _) => left != right,
        _ => return Err(unsupported(op, left, right)),
    };
    Ok(boolean(result))
}

pub(super) fn negate(operand: &Value) -> Result<Value, ErrorKind> {
    match operand {
        Value::Integer(i) => Ok(Value::Integer(i.wrapping_neg())),
        other => Err(ErrorKind::UnsupportedOperandType {
            op: Opcode::Minus,
            operand: other.type_name(),
        }),
    }
}

pub(super) fn bang(operand: &Value) -> Value {
    boolean(!operand.is_truthy())
}

/// Evaluate `container[index]`.
///
/// Out-of-range array indices and missing hash keys yield null.
pub(super) fn index(container: &Value, index: &Value) -> Result<Value, ErrorKind> {
    match (container, index) {
        (Value::Array(elements), Value::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(NULL)),
        (Value::Hash(pairs), key) => {
            let hash_key = key.hash_key().ok_or(ErrorKind::UnusableAsHashKey {
                type_name: key.type_name(),
            })?;
            Ok(pairs
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(NULL))
        }
        _ => Err(unsupported(Opcode::Index, container, index)),
    }
}

/// Build a hash from alternating keys and values.
pub(super) fn build_hash(elements: &[Value]) -> Result<Value, ErrorKind> {
    if elements.len() % 2 != 0 {
        return Err(ErrorKind::OddHashOperandCount {
            count: elements.len(),
        });
    }
    let pairs = elements
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()));
    Value::hash(pairs).map_err(|type_name| ErrorKind::UnusableAsHashKey { type_name })
}

#[inline]
fn boolean(b: bool) -> Value {
    if b { TRUE } else { FALSE }
}

fn unsupported(op: Opcode, left: &Value, right: &Value) -> ErrorKind {
    ErrorKind::UnsupportedOperandTypes {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}
