/// Core execution state and place access.
///
/// Contains the runtime [`core::Context`], the [`core::Flow`] control
/// signal, coercion helpers, and the resolution of place paths to storage
/// locations.
pub mod core;

/// Expression evaluation.
///
/// Evaluates resolved expressions: literals, place loads, unary and binary
/// operations with short-circuit logic, and calls to user callables and
/// built-ins.
pub mod expr;

/// Statement execution.
///
/// Executes resolved statements: declarations, assignment, console I/O,
/// conditionals, and the three loop forms.
pub mod stmt;

/// The file table and file statements.
///
/// Tracks which filenames are open in which mode and implements
/// `OPENFILE`, `READFILE`, `WRITEFILE`, `CLOSEFILE`, and the `EOF` probe.
pub mod file;
