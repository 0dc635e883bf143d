use crate::values::{NULL, Value};

/// Write each argument on its own line.
pub(super) fn puts(args: &[Value]) -> Value {
    #[cfg(feature = "std")]
    for arg in args {
        std::println!("{}", arg);
    }
    #[cfg(not(feature = "std"))]
    let _ = args;
    NULL
}
