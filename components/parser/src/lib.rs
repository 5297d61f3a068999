//! JavaScript parsing for the Kestrel runtime.
//!
//! This crate turns source text into the AST the interpreter walks:
//!
//! - [`Lexer`] - tokenizes source code, also used directly by the REPL's
//!   brace balancer and syntax highlighter
//! - [`Token`] / [`TokenType`] - the token set
//! - [`ast`] - AST node definitions
//! - [`Parser`] - recursive-descent parser producing an [`ast::Program`]
//!
//! The covered grammar is the statement and expression subset the runtime
//! core exercises; see the parser module documentation for the exact list.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ast;
mod error;
mod lexer;
mod parser;
mod token;

pub use error::ParseError;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenCategory, TokenType};
