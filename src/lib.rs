//! # pseudo9608
//!
//! An interpreter for the 9608 pseudocode language from the Cambridge
//! International AS/A Level Computer Science syllabus. Source text flows
//! through a strictly linear pipeline: the scanner produces positioned
//! tokens, the parser builds a statement tree, the resolver type-checks
//! the tree and fixes every expression's type, and the tree-walking
//! evaluator executes the result against a host I/O adapter.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use std::{fs, path::Path};

use log::debug;

use crate::interpreter::{
    evaluator::core::Context,
    io::{HostIo, StdIo},
    lexer, parser, resolver,
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Stmt` types that represent the
/// syntactic structure of source code as a tree, together with source
/// positions for error reporting. The AST is built by the parser and
/// rebuilt by the resolver into its typed form.
pub mod ast;
/// Provides the error types for all four pipeline phases.
///
/// Each phase has its own error enum; every error carries a source
/// position, and displays as
/// `<Phase>Error at line L, column C: <message>`.
pub mod error;
/// The interpreter pipeline: scanner, parser, resolver, and evaluator,
/// plus the value model, frames, built-ins, and host I/O adapters.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

pub use error::Error;

/// Runs pseudocode source text against a caller-provided host adapter.
///
/// The adapter supplies console input/output and the filesystem; see
/// [`interpreter::io::MemoryIo`] for an in-memory implementation.
///
/// # Errors
/// Returns the first error of whichever phase fails: scanning, parsing,
/// resolution, or execution.
///
/// # Examples
/// ```
/// use pseudo9608::{interpreter::io::MemoryIo, run_source_with_io};
///
/// let source = "DECLARE T : INTEGER\n\
///               T <- 0\n\
///               FOR I <- 1 TO 5\n\
///                 T <- T + I\n\
///               ENDFOR\n\
///               OUTPUT T\n";
/// let mut io = MemoryIo::new();
/// run_source_with_io(source, &mut io).unwrap();
/// assert_eq!(io.output(), "15\n");
/// ```
pub fn run_source_with_io(source: &str, io: &mut dyn HostIo) -> Result<(), Error> {
    let tokens = lexer::scan(source)?;
    debug!("scanned {} tokens", tokens.len());
    let stmts = parser::statement::parse_program(&tokens)?;
    debug!("parsed {} top-level statements", stmts.len());
    let program = resolver::core::resolve_program(&stmts)?;
    debug!("resolved {} callables and {} record types",
           program.callables.len(),
           program.records.len());
    let mut context = Context::new(&program, io);
    context.run()?;
    Ok(())
}

/// Runs pseudocode source text against process stdin/stdout and the local
/// filesystem.
///
/// # Errors
/// Returns the first error of whichever phase fails.
pub fn run_source(source: &str) -> Result<(), Error> {
    let mut io = StdIo::new();
    run_source_with_io(source, &mut io)
}

/// Runs the pseudocode program in the file at `path`.
///
/// # Errors
/// Returns the file-reading failure, or the first error of whichever
/// pipeline phase fails.
pub fn run_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    run_source(&source).map_err(Into::into)
}
