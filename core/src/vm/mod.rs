//! Stack-based virtual machine.
//!
//! The VM executes the `{instructions, constants}` pair produced by the
//! compiler. It owns the operand stack, the frame stack, and the globals; all
//! three are allocated up front at their configured capacity.

mod error;
mod frame;
mod operators;
mod options;
mod runtime;
mod stack;


pub use error::{ErrorKind, VmError};
pub use frame::Frame;
pub use options::{GLOBALS_SIZE, MAX_FRAMES, STACK_SIZE, VmOptions};
pub use runtime::VM;
pub use stack::{Stack, StackError};
