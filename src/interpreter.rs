/// The built-in functions pre-registered in the global frame.
///
/// Declares the fixed signatures of `EOF`, `INT`, the string functions, and
/// the random-number functions, together with their implementations.
pub mod builtin;
/// The evaluator executes resolved statements and computes results.
///
/// A tree walker over the resolved program: it evaluates expressions,
/// executes statements against runtime frames and the file table, and
/// drives the host I/O adapter. It is the core execution engine of the
/// interpreter.
///
/// # Responsibilities
/// - Executes resolved statements, threading the `RETURN` control signal.
/// - Binds callable parameters by value or by reference.
/// - Reports runtime errors from the closed runtime error set.
pub mod evaluator;
/// Runtime frames: name tables with shared, aliasable slots.
pub mod frame;
/// Host input/output adapters: process standard streams and the local
/// filesystem, plus an in-memory adapter for tests.
pub mod io;
/// The scanner turns source text into tokens for the parser.
///
/// The scanner reads the raw source text and produces a stream of tokens,
/// each carrying its 1-based line and column. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the character stream into positioned tokens.
/// - Handles literals, identifiers, keywords, and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the scanner and
/// constructs an AST representing the statement structure of the program.
///
/// # Responsibilities
/// - Converts tokens into statement and expression nodes.
/// - Validates the shape of each construct, reporting errors with
///   locations.
/// - Handles expression precedence, statement terminators, and newlines.
pub mod parser;
/// The resolver type-checks the AST before anything runs.
///
/// A static pass between parsing and execution: it interns names into
/// frames, fixes the type of every expression, validates declarations and
/// calls, and rebuilds the tree into its resolved form.
///
/// # Responsibilities
/// - Validates operand types for every operator and call.
/// - Resolves names, fields, and passing modes against declarations.
/// - Checks that every function path reaches a `RETURN`.
pub mod resolver;
/// The resolved program representation executed by the evaluator.
pub mod typed;
/// The static type model: type tags, record definitions, and callable
/// signatures.
pub mod types;
/// The runtime value model.
///
/// Declares the `Value` enum with all supported variants, array and record
/// storage, and the display rules used by `OUTPUT`.
pub mod value;
