use crate::ast::Position;

#[derive(Debug)]
/// Represents all errors that can occur during the static resolution pass.
pub enum ResolveError {
    /// Used a name that is not declared in any enclosing frame.
    Undeclared {
        /// The undeclared name.
        name: String,
        /// Where the name is used.
        pos:  Position,
    },
    /// Declared a name that already exists in the same frame.
    Redeclared {
        /// The clashing name.
        name: String,
        /// Where the second declaration appears.
        pos:  Position,
    },
    /// Referenced a record type that has not been declared.
    UnknownType {
        /// The unknown type name.
        name: String,
        /// Where the type name is used.
        pos:  Position,
    },
    /// An expression has the wrong type for its context.
    TypeMismatch {
        /// A rendering of the type(s) the context requires.
        expected: String,
        /// A rendering of the type found instead.
        found:    String,
        /// Where the mismatch occurs.
        pos:      Position,
    },
    /// A call supplies the wrong number of arguments.
    ArityMismatch {
        /// The callable's name.
        name:     String,
        /// How many parameters the callable declares.
        expected: usize,
        /// How many arguments the call supplies.
        found:    usize,
        /// Where the call appears.
        pos:      Position,
    },
    /// Called something that is not a function in expression position.
    NotAFunction {
        /// The name that was called.
        name: String,
        /// Where the call appears.
        pos:  Position,
    },
    /// Used `CALL` on something that is not a procedure.
    NotAProcedure {
        /// The name that was called.
        name: String,
        /// Where the call appears.
        pos:  Position,
    },
    /// Passed an expression to a `BYREF` parameter, which requires a
    /// variable reference.
    ByRefArgument {
        /// The parameter's name.
        param: String,
        /// Where the offending argument appears.
        pos:   Position,
    },
    /// Used `RETURN` outside a `FUNCTION` body.
    ReturnOutsideFunction {
        /// Where the `RETURN` appears.
        pos: Position,
    },
    /// A function body has a control path that reaches the end without
    /// `RETURN`.
    MissingReturn {
        /// The function's name.
        name: String,
        /// Where the function is declared.
        pos:  Position,
    },
    /// A record declares the same field name twice.
    DuplicateField {
        /// The repeated field name.
        field: String,
        /// Where the second field appears.
        pos:   Position,
    },
    /// Accessed a field that the record type does not declare.
    UnknownField {
        /// The record type's name.
        record: String,
        /// The missing field name.
        field:  String,
        /// Where the access appears.
        pos:    Position,
    },
    /// Indexed an array with the wrong number of index expressions.
    DimensionMismatch {
        /// The array's declared number of dimensions.
        expected: usize,
        /// The number of index expressions supplied.
        found:    usize,
        /// Where the indexing appears.
        pos:      Position,
    },
    /// An array type with unsupported shape: more than two dimensions, a
    /// lower bound above its upper bound, or an array element type.
    InvalidArrayType {
        /// Why the shape is rejected.
        details: String,
        /// Where the declaration appears.
        pos:     Position,
    },
    /// The target of an assignment or `INPUT` is not a variable reference.
    NotAssignable {
        /// Where the target appears.
        pos: Position,
    },
    /// A context that requires a scalar (`INTEGER`, `REAL`, `STRING` or
    /// `BOOLEAN`) received something else.
    ScalarExpected {
        /// A rendering of the type found instead.
        found: String,
        /// Where the value appears.
        pos:   Position,
    },
    /// Record fields may not be arrays.
    FieldTypeUnsupported {
        /// Where the field is declared.
        pos: Position,
    },
}

impl ResolveError {
    /// Gets the source position the error was raised at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Undeclared { pos, .. }
            | Self::Redeclared { pos, .. }
            | Self::UnknownType { pos, .. }
            | Self::TypeMismatch { pos, .. }
            | Self::ArityMismatch { pos, .. }
            | Self::NotAFunction { pos, .. }
            | Self::NotAProcedure { pos, .. }
            | Self::ByRefArgument { pos, .. }
            | Self::ReturnOutsideFunction { pos }
            | Self::MissingReturn { pos, .. }
            | Self::DuplicateField { pos, .. }
            | Self::UnknownField { pos, .. }
            | Self::DimensionMismatch { pos, .. }
            | Self::InvalidArrayType { pos, .. }
            | Self::NotAssignable { pos }
            | Self::ScalarExpected { pos, .. }
            | Self::FieldTypeUnsupported { pos } => *pos,
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pos = self.position();
        write!(f, "ResolveError at line {}, column {}: ", pos.line, pos.column)?;
        match self {
            Self::Undeclared { name, .. } => write!(f, "'{name}' is not declared."),
            Self::Redeclared { name, .. } => write!(f, "'{name}' is already declared."),
            Self::UnknownType { name, .. } => write!(f, "Unknown type '{name}'."),
            Self::TypeMismatch { expected, found, .. } => {
                write!(f, "Expected {expected}, found {found}.")
            },
            Self::ArityMismatch { name, expected, found, .. } => {
                write!(f, "'{name}' takes {expected} argument(s), but {found} were given.")
            },
            Self::NotAFunction { name, .. } => write!(f, "'{name}' is not a FUNCTION."),
            Self::NotAProcedure { name, .. } => write!(f, "'{name}' is not a PROCEDURE."),
            Self::ByRefArgument { param, .. } => {
                write!(f, "BYREF parameter '{param}' requires a variable, not an expression.")
            },
            Self::ReturnOutsideFunction { .. } => {
                write!(f, "RETURN is only allowed inside a FUNCTION.")
            },
            Self::MissingReturn { name, .. } => {
                write!(f, "FUNCTION '{name}' can reach the end of its body without RETURN.")
            },
            Self::DuplicateField { field, .. } => {
                write!(f, "Field '{field}' is declared more than once.")
            },
            Self::UnknownField { record, field, .. } => {
                write!(f, "Type '{record}' has no field '{field}'.")
            },
            Self::DimensionMismatch { expected, found, .. } => {
                write!(f, "Array has {expected} dimension(s), but {found} index(es) were given.")
            },
            Self::InvalidArrayType { details, .. } => write!(f, "Invalid ARRAY type: {details}."),
            Self::NotAssignable { .. } => {
                write!(f, "Target must be a variable, array element, or record field.")
            },
            Self::ScalarExpected { found, .. } => {
                write!(f, "Expected a scalar value, found {found}.")
            },
            Self::FieldTypeUnsupported { .. } => {
                write!(f, "ARRAY fields are not supported inside TYPE.")
            },
        }
    }
}

impl std::error::Error for ResolveError {}
