/// A location in the source text.
///
/// Both coordinates are 1-based: the first character of the first line is at
/// line 1, column 1. Every token and every AST node carries a `Position` so
/// that all four pipeline phases can report errors against the original
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// The source line, starting at 1.
    pub line:   usize,
    /// The column within the line, starting at 1.
    pub column: usize,
}

/// A literal value appearing directly in source code.
///
/// Literals cover the four atomic types of the language. Arrays and records
/// have no literal syntax; they are built up element by element through
/// assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An `INTEGER` literal such as `42`.
    Integer(i64),
    /// A `REAL` literal such as `3.14`.
    Real(f64),
    /// A `STRING` literal such as `"hello"`, stored without its quotes.
    Str(String),
    /// A `BOOLEAN` literal: `TRUE` or `FALSE`.
    Boolean(bool),
}

/// A binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`); always produces a `REAL`
    Div,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`=`)
    Equal,
    /// Not equal to (`<>`)
    NotEqual,
    /// Logical conjunction (`AND`)
    And,
    /// Logical disjunction (`OR`)
    Or,
}

impl BinaryOperator {
    /// Returns `true` for the six relational operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual
                 | Self::Equal
                 | Self::NotEqual)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::And => "AND",
            Self::Or => "OR",
        };
        write!(f, "{operator}")
    }
}

/// A unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical negation (`NOT x`).
    Not,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "NOT"),
        }
    }
}

/// An expression node as produced by the parser.
///
/// Names are not yet resolved and no node carries a type; the resolver
/// rebuilds this tree into [`crate::interpreter::typed::Expr`], where every
/// node has both.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The constant value.
        value: Literal,
        /// Location of the literal token.
        pos:   Position,
    },
    /// A reference to a variable by name.
    Name {
        /// Name of the variable.
        name: String,
        /// Location of the identifier.
        pos:  Position,
    },
    /// A unary operation.
    Unary {
        /// The operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Location of the operator token.
        pos:     Position,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Location of the operator token.
        pos:   Position,
    },
    /// An array indexing expression such as `Data[i]` or `Grid[r, c]`.
    Index {
        /// The expression being indexed.
        array:   Box<Self>,
        /// One index expression per array dimension.
        indexes: Vec<Self>,
        /// Location of the opening bracket.
        pos:     Position,
    },
    /// A record field access such as `Point.X`.
    Field {
        /// The expression whose field is accessed.
        object: Box<Self>,
        /// Name of the field.
        field:  String,
        /// Location of the field name.
        pos:    Position,
    },
    /// A function call such as `LENGTH(Name)`.
    Call {
        /// Name of the callable.
        name: String,
        /// Argument expressions, in order.
        args: Vec<Self>,
        /// Location of the callable name.
        pos:  Position,
    },
}

impl Expr {
    /// Gets the source position from `self`.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Literal { pos, .. }
            | Self::Name { pos, .. }
            | Self::Unary { pos, .. }
            | Self::Binary { pos, .. }
            | Self::Index { pos, .. }
            | Self::Field { pos, .. }
            | Self::Call { pos, .. } => *pos,
        }
    }
}

/// The written form of a type, as it appears after a `:` in a declaration.
///
/// Type names are purely syntactic here; the resolver maps them onto
/// [`crate::interpreter::types::Type`] and validates that named record types
/// exist.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    /// `INTEGER`
    Integer,
    /// `REAL`
    Real,
    /// `STRING`
    String,
    /// `BOOLEAN`
    Boolean,
    /// `ARRAY[lo:hi, ...] OF <element>`
    Array {
        /// Declared `lo:hi` bound pairs, one per dimension.
        bounds: Vec<(i64, i64)>,
        /// The declared element type.
        elem:   Box<TypeName>,
    },
    /// A user-declared record type, referenced by name.
    Named(String),
}

/// How an argument is passed to a callable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// `BYVALUE`: the callable receives a fresh copy of the argument.
    ByValue,
    /// `BYREF`: the callable aliases the argument's storage.
    ByReference,
}

/// The mode a file is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// `READ`: line-oriented reading from the start of the file.
    Read,
    /// `WRITE`: the file is truncated and written line by line.
    Write,
    /// `APPEND`: lines are added after the existing content.
    Append,
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "READ"),
            Self::Write => write!(f, "WRITE"),
            Self::Append => write!(f, "APPEND"),
        }
    }
}

/// A single parameter in a `PROCEDURE` or `FUNCTION` header.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name.
    pub name: String,
    /// The declared parameter type.
    pub ty:   TypeName,
    /// `BYVALUE` (the default) or `BYREF`.
    pub mode: PassMode,
    /// Location of the parameter name.
    pub pos:  Position,
}

/// A parsed `PROCEDURE` or `FUNCTION` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableDecl {
    /// The declared name.
    pub name:        String,
    /// The parameter list, possibly empty.
    pub params:      Vec<Param>,
    /// The declared return type; present for functions, absent for
    /// procedures.
    pub return_type: Option<TypeName>,
    /// The statements of the body.
    pub body:        Vec<Stmt>,
    /// Location of the declared name.
    pub pos:         Position,
}

/// A single field in a `TYPE` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// The field name.
    pub name: String,
    /// The declared field type.
    pub ty:   TypeName,
    /// Location of the field name.
    pub pos:  Position,
}

/// One `literal : statement` arm of a `CASE` block.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    /// The literal this arm matches against.
    pub value: Literal,
    /// The single statement executed on a match.
    pub body:  Box<Stmt>,
    /// Location of the arm's literal.
    pub pos:   Position,
}

/// A statement node as produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `DECLARE <name> : <type>`
    Declare {
        /// The declared variable name.
        name: String,
        /// The declared type, which may be an array type.
        ty:   TypeName,
        /// Location of the declared name.
        pos:  Position,
    },
    /// `TYPE <name> ... ENDTYPE`, declaring a record type.
    TypeDecl {
        /// The declared type name.
        name:   String,
        /// The record's fields, in declared order.
        fields: Vec<FieldDecl>,
        /// Location of the declared name.
        pos:    Position,
    },
    /// `<target> <- <value>`
    Assign {
        /// The assignment target: a name, index, or field reference.
        target: Expr,
        /// The expression whose value is assigned.
        value:  Expr,
        /// Location of the `<-` token.
        pos:    Position,
    },
    /// `OUTPUT <expr>, <expr>, ...`
    Output {
        /// The expressions to display, concatenated without separators.
        exprs: Vec<Expr>,
        /// Location of the `OUTPUT` keyword.
        pos:   Position,
    },
    /// `INPUT <target>`
    Input {
        /// The variable reference that receives the input line.
        target: Expr,
        /// Location of the `INPUT` keyword.
        pos:    Position,
    },
    /// `IF ... THEN ... [ELSE ...] ENDIF`
    If {
        /// The condition; must resolve to `BOOLEAN`.
        cond:      Expr,
        /// Statements of the `THEN` branch.
        then_body: Vec<Stmt>,
        /// Statements of the `ELSE` branch; empty when there is none.
        else_body: Vec<Stmt>,
        /// Location of the `IF` keyword.
        pos:       Position,
    },
    /// `CASE OF ... ENDCASE`
    Case {
        /// The expression each arm literal is compared against.
        subject:   Expr,
        /// The `literal : statement` arms, in source order.
        arms:      Vec<CaseArm>,
        /// The optional `OTHERWISE` statement.
        otherwise: Option<Box<Stmt>>,
        /// Location of the `CASE` keyword.
        pos:       Position,
    },
    /// `WHILE ... DO ... ENDWHILE`
    While {
        /// The pre-condition; must resolve to `BOOLEAN`.
        cond: Expr,
        /// The loop body.
        body: Vec<Stmt>,
        /// Location of the `WHILE` keyword.
        pos:  Position,
    },
    /// `REPEAT ... UNTIL ...`
    Repeat {
        /// The loop body, executed at least once.
        body: Vec<Stmt>,
        /// The post-condition; the loop ends when it becomes `TRUE`.
        cond: Expr,
        /// Location of the `REPEAT` keyword.
        pos:  Position,
    },
    /// `FOR <var> <- <start> TO <stop> [STEP <step>] ... ENDFOR`
    For {
        /// The loop variable, which must be a declared `INTEGER`.
        var:   String,
        /// The initial value expression.
        start: Expr,
        /// The inclusive stop expression.
        stop:  Expr,
        /// The step expression; `1` when absent.
        step:  Option<Expr>,
        /// The loop body.
        body:  Vec<Stmt>,
        /// Location of the `FOR` keyword.
        pos:   Position,
    },
    /// A `PROCEDURE` declaration.
    Procedure(CallableDecl),
    /// A `FUNCTION` declaration.
    Function(CallableDecl),
    /// `CALL <name>(<args>)`
    Call {
        /// Name of the procedure to invoke.
        name: String,
        /// Argument expressions, in order.
        args: Vec<Expr>,
        /// Location of the procedure name.
        pos:  Position,
    },
    /// `RETURN <expr>`
    Return {
        /// The value returned from the enclosing function.
        expr: Expr,
        /// Location of the `RETURN` keyword.
        pos:  Position,
    },
    /// `OPENFILE <filename> FOR <mode>`
    OpenFile {
        /// The filename; always a `STRING`-typed expression after parsing.
        filename: Expr,
        /// The requested open mode.
        mode:     FileMode,
        /// Location of the `OPENFILE` keyword.
        pos:      Position,
    },
    /// `READFILE <filename>, <target>`
    ReadFile {
        /// The filename of an open `READ`-mode file.
        filename: Expr,
        /// The variable reference that receives the next line.
        target:   Expr,
        /// Location of the `READFILE` keyword.
        pos:      Position,
    },
    /// `WRITEFILE <filename>, <expr>`
    WriteFile {
        /// The filename of an open `WRITE`- or `APPEND`-mode file.
        filename: Expr,
        /// The value written as one line.
        value:    Expr,
        /// Location of the `WRITEFILE` keyword.
        pos:      Position,
    },
    /// `CLOSEFILE <filename>`
    CloseFile {
        /// The filename of an open file.
        filename: Expr,
        /// Location of the `CLOSEFILE` keyword.
        pos:      Position,
    },
}
