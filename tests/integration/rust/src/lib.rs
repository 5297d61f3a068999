//! Integration test suite for the Kestrel JavaScript runtime.
//!
//! Verifies that the components work together across crate boundaries:
//! parser output driving the interpreter, the object model observed
//! through whole scripts, and the CLI driver pieces on top.

/// Re-export components for test convenience.
pub mod components {
    pub use core_types;
    pub use js_cli;
    pub use parser;
    pub use runtime;
}
