use crate::ast::Position;

/// An error raised while executing resolved statements.
///
/// Runtime errors pair a [`RuntimeErrorKind`] with the position of the
/// offending construct. When the error escapes a `PROCEDURE` or `FUNCTION`
/// activation, the callable's name is recorded so the diagnostic can say
/// where execution was.
#[derive(Debug)]
pub struct RuntimeError {
    /// What went wrong.
    pub kind:     RuntimeErrorKind,
    /// Where it went wrong.
    pub pos:      Position,
    /// The innermost active callable, when the error was raised inside one.
    pub callable: Option<String>,
}

#[derive(Debug)]
/// The closed set of failures the interpreter can raise.
pub enum RuntimeErrorKind {
    /// Division with a zero divisor.
    DivisionByZero,
    /// An `INPUT` or `READFILE` line could not be converted to the target's
    /// type.
    InputCoercion {
        /// The name of the type the target requires.
        expected: &'static str,
        /// The line that failed to convert.
        line:     String,
    },
    /// No input line was available to read.
    EndOfInput,
    /// An array access outside the declared bounds.
    IndexOutOfBounds {
        /// The evaluated index values.
        indexes: Vec<i64>,
    },
    /// A `FOR` loop with a step of zero.
    ZeroStep,
    /// Read a variable that has never been assigned.
    UnassignedVariable {
        /// The variable's name.
        name: String,
    },
    /// `OPENFILE` on a filename that is already open.
    FileAlreadyOpen {
        /// The filename.
        name: String,
    },
    /// A file statement on a filename that is not open.
    FileNotOpen {
        /// The filename.
        name: String,
    },
    /// A file operation that disagrees with the file's open mode.
    FileModeMismatch {
        /// The filename.
        name: String,
        /// The mode the file is actually open in.
        mode: crate::ast::FileMode,
    },
    /// `READFILE` at end of file.
    ReadPastEof {
        /// The filename.
        name: String,
    },
    /// The host filesystem refused an operation.
    FileError {
        /// The filename.
        name:    String,
        /// The host's description of the failure.
        message: String,
    },
    /// A built-in function received an argument outside its domain.
    InvalidArgument {
        /// The built-in's name.
        name:    &'static str,
        /// Why the argument is invalid.
        details: String,
    },
    /// INTEGER arithmetic overflowed, or a value could not be converted
    /// exactly.
    Overflow,
    /// A FUNCTION body finished without producing a RETURN value.
    MissingReturnValue {
        /// The function's name.
        name: String,
    },
    /// A value had a representation the operation cannot work on. With a
    /// resolved program this indicates an interpreter defect, not a user
    /// error.
    UnexpectedType {
        /// What the operation required.
        expected: &'static str,
    },
}

impl RuntimeError {
    /// Creates an error with no callable context.
    #[must_use]
    pub const fn new(kind: RuntimeErrorKind, pos: Position) -> Self {
        Self { kind,
               pos,
               callable: None }
    }

    /// Records the callable the error escaped from, keeping the innermost
    /// one on nested calls.
    #[must_use]
    pub fn in_callable(mut self, name: &str) -> Self {
        if self.callable.is_none() {
            self.callable = Some(name.to_string());
        }
        self
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,
               "RuntimeError at line {}, column {}: ",
               self.pos.line, self.pos.column)?;
        match &self.kind {
            RuntimeErrorKind::DivisionByZero => write!(f, "Division by zero.")?,
            RuntimeErrorKind::InputCoercion { expected, line } => {
                write!(f, "Cannot convert input '{line}' to {expected}.")?;
            },
            RuntimeErrorKind::EndOfInput => write!(f, "No input available.")?,
            RuntimeErrorKind::IndexOutOfBounds { indexes } => {
                let rendered: Vec<String> = indexes.iter().map(ToString::to_string).collect();
                write!(f, "Index [{}] is out of bounds.", rendered.join(", "))?;
            },
            RuntimeErrorKind::ZeroStep => write!(f, "FOR loop STEP must not be zero.")?,
            RuntimeErrorKind::UnassignedVariable { name } => {
                write!(f, "'{name}' is used before it has been assigned.")?;
            },
            RuntimeErrorKind::FileAlreadyOpen { name } => {
                write!(f, "File '{name}' is already open.")?;
            },
            RuntimeErrorKind::FileNotOpen { name } => write!(f, "File '{name}' is not open.")?,
            RuntimeErrorKind::FileModeMismatch { name, mode } => {
                write!(f, "File '{name}' is open for {mode}.")?;
            },
            RuntimeErrorKind::ReadPastEof { name } => {
                write!(f, "Read past the end of file '{name}'.")?;
            },
            RuntimeErrorKind::FileError { name, message } => {
                write!(f, "File '{name}': {message}.")?;
            },
            RuntimeErrorKind::InvalidArgument { name, details } => {
                write!(f, "Invalid argument to {name}: {details}.")?;
            },
            RuntimeErrorKind::Overflow => write!(f, "INTEGER overflow.")?,
            RuntimeErrorKind::MissingReturnValue { name } => {
                write!(f, "FUNCTION '{name}' finished without RETURN.")?;
            },
            RuntimeErrorKind::UnexpectedType { expected } => {
                write!(f, "Expected {expected}.")?;
            },
        }
        if let Some(name) = &self.callable {
            write!(f, " (in {name})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}
