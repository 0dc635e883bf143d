//! Runtime values manipulated by the VM.

mod function;
mod value;


pub use function::{Builtin, BuiltinFn, Closure, CompiledFunction};
pub use value::{FALSE, HashKey, HashPair, NULL, TRUE, Value};
