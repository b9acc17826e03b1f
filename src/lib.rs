//! marsh: a small interactive shell built around a command pipeline
//! engine.
//!
//! Input flows strictly downward: a raw line is split into words by the
//! [`lexer`], the words become a [`Pipeline`](ast::Pipeline) of command
//! stages in the [`parser`], and the [`executor`] wires that pipeline
//! onto builtins or forked child processes connected by anonymous
//! pipes.

pub mod ast;
pub mod config;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod prompt;
pub mod repl;
