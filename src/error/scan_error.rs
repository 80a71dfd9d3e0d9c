use crate::ast::Position;

#[derive(Debug)]
/// Represents all errors that can occur while scanning source text.
pub enum ScanError {
    /// Encountered a character that starts no token.
    BadCharacter {
        /// The offending source slice.
        lexeme: String,
        /// Where the character appears.
        pos:    Position,
    },
    /// A string literal was opened but the line ended before the closing
    /// quote.
    UnterminatedString {
        /// Where the string was opened.
        pos: Position,
    },
    /// A real literal without digits on both sides of the point, such as
    /// `3.` or `.5`.
    MalformedReal {
        /// The offending source slice.
        lexeme: String,
        /// Where the literal starts.
        pos:    Position,
    },
    /// An integer literal too large to represent.
    IntegerOutOfRange {
        /// The offending source slice.
        lexeme: String,
        /// Where the literal starts.
        pos:    Position,
    },
}

impl ScanError {
    /// Gets the source position the error was raised at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::BadCharacter { pos, .. }
            | Self::UnterminatedString { pos }
            | Self::MalformedReal { pos, .. }
            | Self::IntegerOutOfRange { pos, .. } => *pos,
        }
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pos = self.position();
        write!(f, "ScanError at line {}, column {}: ", pos.line, pos.column)?;
        match self {
            Self::BadCharacter { lexeme, .. } => {
                write!(f, "Unrecognised character '{lexeme}'.")
            },
            Self::UnterminatedString { .. } => write!(f, "Unterminated string."),
            Self::MalformedReal { lexeme, .. } => {
                write!(f, "Malformed REAL literal '{lexeme}'.")
            },
            Self::IntegerOutOfRange { lexeme, .. } => {
                write!(f, "INTEGER literal '{lexeme}' is out of range.")
            },
        }
    }
}

impl std::error::Error for ScanError {}
