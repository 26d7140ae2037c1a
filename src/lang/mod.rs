/*!
# Rust Language Module

This Rust module provides lexical analysis of the BASIC language
and a token cursor for the single-pass compiler in `mach`.

*/

#[macro_use]
mod error;
mod lex;
mod parse;
pub mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::{lex, unescape_markup, Lexer};
pub use parse::Parser;

/// Source lines are counted from 1.
pub type LineNumber = usize;
