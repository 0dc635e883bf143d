use alloc::rc::Rc;

use crate::{code::Instructions, values::Closure};

/// One function activation.
///
/// `ip` is the byte offset of the next instruction to decode. `base_pointer`
/// is the stack index of the first argument; arguments and then the remaining
/// declared locals occupy the slots from there on.
#[derive(Debug, Clone)]
pub struct Frame {
    closure: Rc<Closure>,
    pub ip: usize,
    pub base_pointer: usize,
}

impl Frame {
    pub fn new(closure: Rc<Closure>, base_pointer: usize) -> Self {
        Frame {
            closure,
            ip: 0,
            base_pointer,
        }
    }

    #[inline]
    pub fn closure(&self) -> &Rc<Closure> {
        &self.closure
    }

    #[inline]
    pub fn instructions(&self) -> &Instructions {
        self.closure.instructions()
    }

    /// Number of local slots, arguments included.
    #[inline]
    pub fn num_locals(&self) -> usize {
        let func = &self.closure.func;
        func.num_locals.max(func.num_parameters)
    }

    /// First stack index above this frame's locals. Operand pops never go
    /// below it.
    #[inline]
    pub fn locals_end(&self) -> usize {
        self.base_pointer + self.num_locals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::CompiledFunction;

    #[test]
    fn test_new_frame() {
        let func = Rc::new(CompiledFunction::new(Instructions::new(), 3, 1));
        let frame = Frame::new(Rc::new(Closure::new(func, vec![])), 4);
        assert_eq!(frame.ip, 0);
        assert_eq!(frame.base_pointer, 4);
        assert_eq!(frame.num_locals(), 3);
        assert_eq!(frame.locals_end(), 7);
    }

    #[test]
    fn test_parameters_always_get_slots() {
        let func = Rc::new(CompiledFunction::new(Instructions::new(), 0, 2));
        let frame = Frame::new(Rc::new(Closure::new(func, vec![])), 1);
        assert_eq!(frame.locals_end(), 3);
    }
}
