use alloc::fmt;

use crate::{Vec, vec};

/// Error returned by [`Stack`] operations that would leave its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    Overflow { capacity: usize },
    Underflow,
}

/// A fixed-capacity stack addressed by a stack pointer.
///
/// All slots are allocated up front and the stack never grows. Popping only
/// moves the stack pointer, so the most recently popped value stays readable
/// through [`Stack::last_popped`] until something is pushed over it.
///
/// # Examples
///
/// ```
/// use monkey_core::vm::Stack;
///
/// let mut stack: Stack<i32> = Stack::new(100);
/// stack.push(42).unwrap();
/// stack.push(17).unwrap();
/// assert_eq!(stack.pop(), Ok(17));
/// assert_eq!(stack.last_popped(), Some(&17));
/// assert_eq!(stack.len(), 1);
///
/// let mut full: Stack<i32> = Stack::new(1);
/// full.push(1).unwrap();
/// assert!(full.push(2).is_err());
/// ```
pub struct Stack<T> {
    /// Slot storage; `items.len()` is the capacity.
    items: Vec<T>,
    /// Index of the next free slot. Slots at or above `sp` are stale.
    sp: usize,
}

impl<T: Clone + Default> Stack<T> {
    /// Creates a new stack with every slot preallocated.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: vec![T::default(); capacity],
            sp: 0,
        }
    }

    /// Pushes a value onto the stack.
    ///
    /// Fails with [`StackError::Overflow`] when every slot is in use.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), StackError> {
        let capacity = self.items.len();
        let slot = self
            .items
            .get_mut(self.sp)
            .ok_or(StackError::Overflow { capacity })?;
        *slot = value;
        self.sp += 1;
        Ok(())
    }

    /// Removes and returns the top value from the stack.
    ///
    /// The slot keeps its value, see [`Stack::last_popped`].
    #[inline]
    pub fn pop(&mut self) -> Result<T, StackError> {
        if self.sp == 0 {
            return Err(StackError::Underflow);
        }
        self.sp -= 1;
        Ok(self.items[self.sp].clone())
    }

    /// Moves the stack pointer up to `new_len`, resetting the claimed slots to
    /// their default value.
    ///
    /// Does nothing if `new_len` is not above the current length.
    pub fn grow_to(&mut self, new_len: usize) -> Result<(), StackError> {
        if new_len > self.items.len() {
            return Err(StackError::Overflow {
                capacity: self.items.len(),
            });
        }
        if new_len > self.sp {
            self.items[self.sp..new_len].fill(T::default());
            self.sp = new_len;
        }
        Ok(())
    }
}

impl<T> Stack<T> {
    /// The slot right above the top of the stack: the value most recently
    /// popped, if nothing has been pushed since.
    #[inline]
    pub fn last_popped(&self) -> Option<&T> {
        self.items.get(self.sp)
    }

    /// Returns a reference to the top value without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.sp.checked_sub(1).map(|top| &self.items[top])
    }

    /// Returns the element at absolute position `index`, counted from the
    /// bottom. Slots at or above the stack pointer are not visible.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Overwrites the element at absolute position `index`.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) -> Result<(), StackError> {
        let slot = self.items[..self.sp]
            .get_mut(index)
            .ok_or(StackError::Underflow)?;
        *slot = value;
        Ok(())
    }

    /// Lowers the stack pointer to `new_len`.
    ///
    /// Does nothing if `new_len` is not below the current length.
    #[inline]
    pub fn truncate(&mut self, new_len: usize) {
        self.sp = self.sp.min(new_len);
    }

    /// Returns a slice of the top `n` elements on the stack, ordered from
    /// bottom to top.
    ///
    /// Returns `None` if there are fewer than `n` elements on the stack.
    #[inline]
    pub fn top_n(&self, n: usize) -> Option<&[T]> {
        let start = self.sp.checked_sub(n)?;
        Some(&self.items[start..self.sp])
    }

    /// Live elements, bottom to top.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.sp]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sp
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("items", &self.as_slice())
            .field("len", &self.sp)
            .field("capacity", &self.items.len())
            .finish()
    }
}
