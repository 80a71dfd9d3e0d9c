/// The parser state and expression grammar.
///
/// Contains the [`core::Parser`] type, the precedence-climbing expression
/// parsers, and the postfix forms (indexing, field access, calls).
pub mod core;

/// Statement parsing.
///
/// Implements the statement grammar: declarations, assignment, conditionals,
/// loops, callables, and the file statements, plus the program entry point.
pub mod statement;

/// Token-matching helpers shared by the grammar.
///
/// Provides peek/advance primitives, expected-token matching with error
/// reporting, and newline handling.
pub mod utils;
