//! Native functions addressable by index from bytecode.
//!
//! The registry order is part of the compiler/VM contract: `OpGetBuiltin`
//! carries an index into [`BUILTINS`], so entries may only be appended.
//!
//! Builtins never abort the VM. Bad arguments produce a [`Value::Error`]
//! that the running program can inspect or ignore.

mod array;
mod io;

#[cfg(test)]
mod builtins_test;

use crate::{
    format,
    values::{Builtin, Value},
};

/// The default builtin registry.
pub static BUILTINS: [Builtin; 6] = [
    Builtin::new("len", array::len),
    Builtin::new("puts", io::puts),
    Builtin::new("first", array::first),
    Builtin::new("last", array::last),
    Builtin::new("rest", array::rest),
    Builtin::new("push", array::push),
];

/// Find a builtin by name, returning its registry index.
pub fn lookup(name: &str) -> Option<(usize, &'static Builtin)> {
    BUILTINS
        .iter()
        .enumerate()
        .find(|(_, builtin)| builtin.name == name)
}

fn check_arity(args: &[Value], want: usize) -> Result<(), Value> {
    if args.len() == want {
        Ok(())
    } else {
        Err(Value::error(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        )))
    }
}
