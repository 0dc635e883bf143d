use alloc::rc::Rc;

use tracing::{debug, trace, warn};

use crate::{
    Vec,
    builtins::BUILTINS,
    bytecode::Bytecode,
    code::{Opcode, Operands, read_operands},
    values::{Builtin, Closure, CompiledFunction, FALSE, NULL, TRUE, Value},
    vec,
    vm::{ErrorKind, Frame, Stack, VmError, VmOptions, operators},
};

/// A single-use virtual machine.
///
/// One instance runs one program, to completion or to its first error.
pub struct VM<'b> {
    constants: &'b [Value],
    builtins: &'b [Builtin],
    globals: Vec<Value>,
    stack: Stack<Value>,
    frames: Vec<Frame>,
    max_frames: usize,
    finished: bool,
}

impl<'b> VM<'b> {
    pub fn new(bytecode: &'b Bytecode) -> Self {
        Self::with_options(bytecode, VmOptions::default())
    }

    pub fn with_options(bytecode: &'b Bytecode, options: VmOptions) -> Self {
        let main_fn = CompiledFunction::new(bytecode.instructions.clone(), 0, 0);
        let main_closure = Rc::new(Closure::new(Rc::new(main_fn), Vec::new()));

        let mut frames = Vec::with_capacity(options.max_frames);
        frames.push(Frame::new(main_closure, 0));

        VM {
            constants: &bytecode.constants,
            builtins: &BUILTINS,
            globals: vec![NULL; options.globals_size],
            stack: Stack::new(options.stack_size),
            frames,
            max_frames: options.max_frames,
            finished: false,
        }
    }

    /// Replace the builtin registry `OpGetBuiltin` indexes into.
    pub fn with_builtins(mut self, builtins: &'b [Builtin]) -> Self {
        self.builtins = builtins;
        self
    }

    /// Convenience: run `bytecode` with default options and return the value
    /// of its last expression statement.
    pub fn execute(bytecode: &Bytecode) -> Result<Value, VmError> {
        let mut vm = VM::new(bytecode);
        vm.run()?;
        Ok(vm.last_popped_stack_elem().clone())
    }

    /// The value on top of the operand stack, if any.
    pub fn stack_top(&self) -> Option<&Value> {
        self.stack.peek()
    }

    /// The value most recently popped off the operand stack. After a run this
    /// is the program's result.
    pub fn last_popped_stack_elem(&self) -> &Value {
        self.stack.last_popped().unwrap_or(&NULL)
    }

    /// Live operand stack contents, bottom to top.
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    pub fn globals(&self) -> &[Value] {
        &self.globals
    }

    /// Run the program to completion.
    ///
    /// The first error aborts the run. A VM runs only once; later calls fail
    /// with [`ErrorKind::AlreadyRun`].
    pub fn run(&mut self) -> Result<(), VmError> {
        if self.finished {
            return Err(VmError::new(ErrorKind::AlreadyRun, 0, 0));
        }
        self.finished = true;

        debug!(
            instructions = self.current_frame().instructions().len(),
            constants = self.constants.len(),
            "vm start"
        );
        let result = self.run_loop();
        match &result {
            Ok(()) => debug!(stack = self.stack.len(), "vm finished"),
            Err(err) => warn!(%err, "vm aborted"),
        }
        result
    }

    fn run_loop(&mut self) -> Result<(), VmError> {
        loop {
            let depth = self.frames.len();
            let frame = self.current_frame();
            let ip = frame.ip;
            let instructions = frame.instructions();

            if ip >= instructions.len() {
                if depth == 1 {
                    return Ok(());
                }
                // Running off the end of a function body is a bare return.
                self.return_from_call(NULL)
                    .map_err(|kind| VmError::new(kind, ip, depth))?;
                continue;
            }

            let (op, operands) = decode(instructions, ip)
                .map_err(|kind| VmError::new(kind, ip, depth))?;
            self.current_frame_mut().ip = ip + op.definition().instruction_len();

            trace!(offset = ip, depth, op = op.name(), ?operands, "dispatch");
            self.dispatch(op, &operands)
                .map_err(|kind| VmError::new(kind, ip, depth))?;
        }
    }

    fn dispatch(&mut self, op: Opcode, operands: &Operands) -> Result<(), ErrorKind> {
        match op {
            Opcode::Constant => {
                let constant = self.constant(operands[0])?.clone();
                self.push(constant)
            }

            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                let right = self.pop()?;
                let left = self.pop()?;
                self.push(operators::binary(op, &left, &right)?)
            }

            Opcode::Equal | Opcode::NotEqual | Opcode::GreaterThan => {
                let right = self.pop()?;
                let left = self.pop()?;
                self.push(operators::compare(op, &left, &right)?)
            }

            Opcode::Minus => {
                let operand = self.pop()?;
                self.push(operators::negate(&operand)?)
            }

            Opcode::Bang => {
                let operand = self.pop()?;
                self.push(operators::bang(&operand))
            }

            Opcode::Pop => self.pop().map(drop),
            Opcode::True => self.push(TRUE),
            Opcode::False => self.push(FALSE),
            Opcode::Null => self.push(NULL),

            Opcode::Jump => {
                self.current_frame_mut().ip = operands[0];
                Ok(())
            }

            Opcode::JumpNotTruthy => {
                let condition = self.pop()?;
                if !condition.is_truthy() {
                    self.current_frame_mut().ip = operands[0];
                }
                Ok(())
            }

            Opcode::SetGlobal => {
                let index = operands[0];
                let capacity = self.globals.len();
                let value = self.pop()?;
                let slot = self
                    .globals
                    .get_mut(index)
                    .ok_or(ErrorKind::GlobalIndexOutOfRange { index, capacity })?;
                *slot = value;
                Ok(())
            }

            Opcode::GetGlobal => {
                let index = operands[0];
                let value = self.globals.get(index).cloned().ok_or(
                    ErrorKind::GlobalIndexOutOfRange {
                        index,
                        capacity: self.globals.len(),
                    },
                )?;
                self.push(value)
            }

            Opcode::SetLocal => {
                let slot = self.local_slot(operands[0])?;
                let value = self.pop()?;
                self.stack.set(slot, value)?;
                Ok(())
            }

            Opcode::GetLocal => {
                let slot = self.local_slot(operands[0])?;
                let value = self
                    .stack
                    .get(slot)
                    .cloned()
                    .ok_or(ErrorKind::OperandStackUnderflow)?;
                self.push(value)
            }

            Opcode::GetBuiltin => {
                let index = operands[0];
                let builtin = self.builtins.get(index).copied().ok_or(
                    ErrorKind::BuiltinIndexOutOfRange {
                        index,
                        len: self.builtins.len(),
                    },
                )?;
                self.push(Value::Builtin(builtin))
            }

            Opcode::GetFree => {
                let index = operands[0];
                let free = &self.current_frame().closure().free;
                let value = free
                    .get(index)
                    .cloned()
                    .ok_or(ErrorKind::FreeIndexOutOfRange {
                        index,
                        len: free.len(),
                    })?;
                self.push(value)
            }

            Opcode::Array => {
                let elements = self.pop_n(operands[0])?;
                self.push(Value::array(elements))
            }

            Opcode::Hash => {
                let elements = self.pop_n(operands[0])?;
                self.push(operators::build_hash(&elements)?)
            }

            Opcode::Index => {
                let index = self.pop()?;
                let container = self.pop()?;
                self.push(operators::index(&container, &index)?)
            }

            Opcode::Closure => self.push_closure(operands[0], operands[1]),
            Opcode::Call => self.execute_call(operands[0]),

            Opcode::ReturnValue => {
                let return_value = self.pop()?;
                self.return_from_call(return_value)
            }

            Opcode::Return => self.return_from_call(NULL),
        }
    }

    fn execute_call(&mut self, num_args: usize) -> Result<(), ErrorKind> {
        let callee_slot = self
            .stack
            .len()
            .checked_sub(num_args + 1)
            .filter(|&slot| slot >= self.current_frame().locals_end())
            .ok_or(ErrorKind::OperandStackUnderflow)?;
        let callee = self
            .stack
            .get(callee_slot)
            .cloned()
            .ok_or(ErrorKind::OperandStackUnderflow)?;

        match callee {
            Value::Closure(closure) => self.call_closure(closure, num_args),
            Value::Builtin(builtin) => self.call_builtin(builtin, num_args),
            other => Err(ErrorKind::NotCallable {
                type_name: other.type_name(),
            }),
        }
    }

    fn call_closure(&mut self, closure: Rc<Closure>, num_args: usize) -> Result<(), ErrorKind> {
        if num_args != closure.func.num_parameters {
            return Err(ErrorKind::ArgumentCountMismatch {
                expected: closure.func.num_parameters,
                got: num_args,
            });
        }
        if self.frames.len() >= self.max_frames {
            return Err(ErrorKind::CallStackOverflow {
                max_depth: self.max_frames,
            });
        }

        let base_pointer = self.stack.len() - num_args;
        let frame = Frame::new(closure, base_pointer);
        self.stack.grow_to(frame.locals_end())?;

        debug!(
            depth = self.frames.len() + 1,
            base_pointer,
            num_args,
            "call"
        );
        self.frames.push(frame);
        Ok(())
    }

    fn call_builtin(&mut self, builtin: Builtin, num_args: usize) -> Result<(), ErrorKind> {
        let args = self
            .stack
            .top_n(num_args)
            .ok_or(ErrorKind::OperandStackUnderflow)?;
        trace!(builtin = builtin.name, num_args, "call builtin");
        let result = builtin.call(args);

        // Drop the arguments and the callee below them.
        self.stack.truncate(self.stack.len() - num_args - 1);
        self.push(result)
    }

    fn return_from_call(&mut self, return_value: Value) -> Result<(), ErrorKind> {
        if self.frames.len() <= 1 {
            return Err(ErrorKind::ReturnOutsideFunction);
        }
        let frame = self
            .frames
            .pop()
            .ok_or(ErrorKind::ReturnOutsideFunction)?;
        debug!(depth = self.frames.len() + 1, "return");

        // Discard the callee together with its arguments and locals.
        self.stack.truncate(frame.base_pointer - 1);
        self.push(return_value)
    }

    fn push_closure(&mut self, const_index: usize, num_free: usize) -> Result<(), ErrorKind> {
        let func = match self.constant(const_index)? {
            Value::CompiledFunction(func) => func.clone(),
            other => {
                return Err(ErrorKind::NotAFunction {
                    type_name: other.type_name(),
                });
            }
        };
        let free = self.pop_n(num_free)?;
        self.push(Value::closure(Closure::new(func, free)))
    }

    fn constant(&self, index: usize) -> Result<&'b Value, ErrorKind> {
        let constants: &'b [Value] = self.constants;
        constants
            .get(index)
            .ok_or(ErrorKind::ConstantIndexOutOfRange {
                index,
                len: constants.len(),
            })
    }

    /// Absolute stack slot of local `index` in the current frame.
    fn local_slot(&self, index: usize) -> Result<usize, ErrorKind> {
        let frame = self.current_frame();
        let num_locals = frame.num_locals();
        if index >= num_locals {
            return Err(ErrorKind::LocalIndexOutOfRange { index, num_locals });
        }
        Ok(frame.base_pointer + index)
    }

    #[inline]
    fn push(&mut self, value: Value) -> Result<(), ErrorKind> {
        Ok(self.stack.push(value)?)
    }

    /// Pop an operand. Never reaches into the current frame's locals.
    #[inline]
    fn pop(&mut self) -> Result<Value, ErrorKind> {
        if self.stack.len() <= self.current_frame().locals_end() {
            return Err(ErrorKind::OperandStackUnderflow);
        }
        Ok(self.stack.pop()?)
    }

    /// Pop `n` operands, returned in the order they were pushed.
    fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, ErrorKind> {
        let floor = self.current_frame().locals_end();
        if n > self.stack.len().saturating_sub(floor) {
            return Err(ErrorKind::OperandStackUnderflow);
        }
        let values = self
            .stack
            .top_n(n)
            .ok_or(ErrorKind::OperandStackUnderflow)?
            .to_vec();
        self.stack.truncate(self.stack.len() - n);
        Ok(values)
    }

    #[inline]
    fn current_frame(&self) -> &Frame {
        // The outermost frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    #[inline]
    fn current_frame_mut(&mut self) -> &mut Frame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }
}

fn decode(instructions: &[u8], ip: usize) -> Result<(Opcode, Operands), ErrorKind> {
    let op = Opcode::try_from(instructions[ip])?;
    let (operands, _) = read_operands(op.definition(), &instructions[ip + 1..])?;
    Ok((op, operands))
}
