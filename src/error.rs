/// Scanning errors.
///
/// Defines the errors raised while turning source text into tokens:
/// unrecognised characters, unterminated strings, and malformed literals.
pub mod scan_error;
/// Parsing errors.
///
/// Defines the errors raised while turning tokens into an AST: unexpected
/// tokens, missing terminators, and malformed constructs.
pub mod parse_error;
/// Resolution errors.
///
/// Defines the errors raised by the static pass: undeclared names, duplicate
/// declarations, type mismatches, arity mismatches, and return checking.
pub mod resolve_error;
/// Runtime errors.
///
/// Defines the errors raised during execution: division by zero, input
/// coercion failures, array bounds, file misuse, and the rest of the closed
/// runtime error set.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use resolve_error::ResolveError;
pub use runtime_error::{RuntimeError, RuntimeErrorKind};
pub use scan_error::ScanError;

/// Any error raised by one of the four pipeline phases.
///
/// The driver prints the error's `Display` form, which follows the format
/// `<Phase>Error at line L, column C: <message>` for every variant.
#[derive(Debug)]
pub enum Error {
    /// The scanner rejected the source text.
    Scan(ScanError),
    /// The parser rejected the token stream.
    Parse(ParseError),
    /// The resolver rejected the program.
    Resolve(ResolveError),
    /// The interpreter failed while executing.
    Runtime(RuntimeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scan(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Resolve(e) => write!(f, "{e}"),
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ScanError> for Error {
    fn from(e: ScanError) -> Self {
        Self::Scan(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<ResolveError> for Error {
    fn from(e: ResolveError) -> Self {
        Self::Resolve(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}
