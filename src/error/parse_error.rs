use crate::ast::Position;

#[derive(Debug)]
/// Represents all errors that can occur while parsing tokens.
pub enum ParseError {
    /// Found a token other than the one the grammar requires.
    UnexpectedToken {
        /// A description of what the parser was looking for.
        expected: String,
        /// A rendering of the token found instead.
        found:    String,
        /// Where the unexpected token appears.
        pos:      Position,
    },
    /// Reached the end of the source inside an unfinished construct.
    UnexpectedEndOfInput {
        /// The position of the last scanned token.
        pos: Position,
    },
    /// Found a token where a statement should begin.
    ExpectedStatement {
        /// A rendering of the token found instead.
        found: String,
        /// Where the token appears.
        pos:   Position,
    },
    /// Relational operators do not chain: `a < b < c` is rejected.
    ChainedComparison {
        /// The position of the second relational operator.
        pos: Position,
    },
}

impl ParseError {
    /// Gets the source position the error was raised at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEndOfInput { pos }
            | Self::ExpectedStatement { pos, .. }
            | Self::ChainedComparison { pos } => *pos,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pos = self.position();
        write!(f, "ParseError at line {}, column {}: ", pos.line, pos.column)?;
        match self {
            Self::UnexpectedToken { expected, found, .. } => {
                write!(f, "Expected {expected}, found {found}.")
            },
            Self::UnexpectedEndOfInput { .. } => write!(f, "Unexpected end of input."),
            Self::ExpectedStatement { found, .. } => {
                write!(f, "Expected a statement, found {found}.")
            },
            Self::ChainedComparison { .. } => {
                write!(f, "Comparison operators cannot be chained.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
