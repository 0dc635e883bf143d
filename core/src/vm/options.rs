//! Resource limits for a VM run.

/// Operand stack slots.
pub const STACK_SIZE: usize = 2048;
/// Global binding slots, the full range of a 2-byte operand.
pub const GLOBALS_SIZE: usize = 65536;
/// Maximum call depth, the outermost frame included.
pub const MAX_FRAMES: usize = 1024;

/// Configuration options for program execution.
///
/// Every limit is allocated up front when the VM is built; exceeding one at
/// run time aborts the program.
///
/// # Example
///
/// ```
/// use monkey_core::vm::VmOptions;
///
/// let options = VmOptions {
///     max_frames: 64,
///     ..VmOptions::default()
/// };
/// assert_eq!(options.stack_size, 2048);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmOptions {
    /// Operand stack capacity.
    ///
    /// Default: 2048
    pub stack_size: usize,

    /// Number of global slots.
    ///
    /// Default: 65536
    pub globals_size: usize,

    /// Maximum call depth.
    ///
    /// Default: 1024
    pub max_frames: usize,
}

impl Default for VmOptions {
    fn default() -> Self {
        Self {
            stack_size: STACK_SIZE,
            globals_size: GLOBALS_SIZE,
            max_frames: MAX_FRAMES,
        }
    }
}
