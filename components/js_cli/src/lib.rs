//! Kestrel JavaScript runtime CLI library.
//!
//! Provides the pieces the `kestrel-js` binary is assembled from: CLI
//! argument definitions, the REPL driver with its brace balancer and
//! syntax highlighting, the value pretty printer and the styled console
//! client.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod console;
pub mod error;
pub mod printer;
pub mod repl;
pub mod run;

pub use cli::Cli;
pub use error::{CliError, CliResult};
