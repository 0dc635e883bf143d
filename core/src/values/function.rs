use alloc::rc::Rc;
use core::fmt;

use crate::{Vec, code::Instructions, values::Value};

/// Function body produced by the compiler and stored in the constant pool.
///
/// `num_locals` counts every local slot, parameters included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledFunction {
    pub instructions: Instructions,
    pub num_locals: usize,
    pub num_parameters: usize,
}

impl CompiledFunction {
    pub fn new(instructions: Instructions, num_locals: usize, num_parameters: usize) -> Self {
        CompiledFunction {
            instructions,
            num_locals,
            num_parameters,
        }
    }
}

/// A compiled function bound to the values it captured when it was created.
///
/// The captured list is fixed at creation time; nothing writes to it later.
#[derive(Debug, Clone)]
pub struct Closure {
    pub func: Rc<CompiledFunction>,
    pub free: Vec<Value>,
}

impl Closure {
    pub fn new(func: Rc<CompiledFunction>, free: Vec<Value>) -> Self {
        Closure { func, free }
    }

    #[inline]
    pub fn instructions(&self) -> &Instructions {
        &self.func.instructions
    }
}

/// Signature of a native function.
///
/// Failures are reported as [`Value::Error`], never by aborting the VM.
pub type BuiltinFn = fn(&[Value]) -> Value;

/// A native function callable from bytecode without pushing a frame.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, func: BuiltinFn) -> Self {
        Builtin { name, func }
    }

    #[inline]
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

/// Builtins are identified by name, the key a registry is looked up by.
/// Function pointers are not compared: the same function can have more than
/// one address, and distinct functions can share one.
impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}
