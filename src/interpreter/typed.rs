//! The resolved form of a program.
//!
//! The resolver rebuilds the parse tree into the types defined here. Every
//! expression carries its resolved [`Type`]; every name carries the frame it
//! lives in; every assignment and `BYREF` argument has been turned into an
//! explicit [`Place`] path that the interpreter can resolve to a storage
//! location. The interpreter never performs a type check of its own: it
//! trusts the annotations made here.

use std::collections::HashMap;

use crate::{
    ast::{BinaryOperator, FileMode, Literal, Position, UnaryOperator},
    interpreter::{
        builtin::Builtin,
        types::{RecordDef, Signature, Type},
    },
};

/// Which frame a name lives in.
///
/// The language has exactly two lexical levels: the global frame, and one
/// activation frame per `PROCEDURE`/`FUNCTION` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The single global frame.
    Global,
    /// The current callable activation.
    Local,
}

/// One step of a place path.
#[derive(Debug, Clone)]
pub enum PlaceStep {
    /// Array indexing; one expression per dimension.
    Index(Vec<Expr>),
    /// Record field access.
    Field(String),
}

/// A path to a storage location: a root variable plus zero or more
/// index/field steps.
///
/// Places are how the resolver represents everything that can be written
/// to: assignment targets, `INPUT` and `READFILE` targets, `FOR` loop
/// variables, and `BYREF` arguments. The interpreter re-resolves the path
/// against the live frames on each access, which keeps `BYREF` aliasing
/// explicit.
#[derive(Debug, Clone)]
pub struct Place {
    /// The frame the root variable lives in.
    pub scope: Scope,
    /// The root variable's name.
    pub name:  String,
    /// Index and field steps applied to the root, in order.
    pub steps: Vec<PlaceStep>,
    /// Where the reference appears in the source.
    pub pos:   Position,
}

/// A resolved expression: its kind, its type, and its position.
#[derive(Debug, Clone)]
pub struct Expr {
    /// What the expression is.
    pub kind: ExprKind,
    /// The resolved static type.
    pub ty:   Type,
    /// Where the expression appears in the source.
    pub pos:  Position,
}

/// The kinds of resolved expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// A literal value.
    Literal(Literal),
    /// A read through a place: a variable, array element, or record field.
    Load(Place),
    /// A unary operation.
    Unary {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A function call.
    Call(Call),
}

/// A resolved call to a function or procedure.
#[derive(Debug, Clone)]
pub struct Call {
    /// The callable's name.
    pub name:    String,
    /// The built-in this call targets, or `None` for a user callable.
    pub builtin: Option<Builtin>,
    /// The arguments, classified by passing mode.
    pub args:    Vec<Arg>,
    /// Where the call appears.
    pub pos:     Position,
}

/// A resolved call argument.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Copied into the parameter's slot at call time.
    ByValue(Expr),
    /// Aliased: the parameter shares the argument's storage location.
    ByReference(Place),
}

/// A resolved statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Creates a slot in the current frame, initialised to null (or to an
    /// empty array/record of the declared shape).
    Declare {
        /// The variable name.
        name:  String,
        /// The frame to create the slot in.
        scope: Scope,
        /// The declared type.
        ty:    Type,
        /// Where the declaration appears.
        pos:   Position,
    },
    /// Writes an evaluated value through a place.
    Assign {
        /// The storage location written to.
        target: Place,
        /// The target's declared type; the value widens to it if needed.
        ty:     Type,
        /// The value expression.
        value:  Expr,
        /// Where the assignment appears.
        pos:    Position,
    },
    /// Renders each expression and writes one output line.
    Output {
        /// The expressions to render, in order.
        exprs: Vec<Expr>,
        /// Where the statement appears.
        pos:   Position,
    },
    /// Reads one input line and coerces it into a place.
    Input {
        /// The storage location written to.
        target: Place,
        /// The target's scalar type, used for coercion.
        ty:     Type,
        /// Where the statement appears.
        pos:    Position,
    },
    /// Two-way branch.
    If {
        /// The `BOOLEAN` condition.
        cond:      Expr,
        /// Statements executed when the condition holds.
        then_body: Vec<Stmt>,
        /// Statements executed otherwise; may be empty.
        else_body: Vec<Stmt>,
        /// Where the `IF` appears.
        pos:       Position,
    },
    /// Multi-way branch on literal values.
    Case {
        /// The expression compared against each arm.
        subject:   Expr,
        /// `(literal, statement)` arms in source order; the first match
        /// wins.
        arms:      Vec<(Literal, Stmt)>,
        /// Executed when no arm matches.
        otherwise: Option<Box<Stmt>>,
        /// Where the `CASE` appears.
        pos:       Position,
    },
    /// Pre-condition loop.
    While {
        /// The `BOOLEAN` condition, checked before each iteration.
        cond: Expr,
        /// The loop body.
        body: Vec<Stmt>,
        /// Where the `WHILE` appears.
        pos:  Position,
    },
    /// Post-condition loop; the body runs at least once.
    Repeat {
        /// The loop body.
        body: Vec<Stmt>,
        /// The `BOOLEAN` condition; the loop ends when it becomes `TRUE`.
        cond: Expr,
        /// Where the `REPEAT` appears.
        pos:  Position,
    },
    /// Counted loop over an `INTEGER` variable.
    For {
        /// The loop variable.
        var:   Place,
        /// Evaluated once at entry.
        start: Expr,
        /// Evaluated once at entry; the loop is inclusive of this value.
        stop:  Expr,
        /// Evaluated once at entry; `1` when absent. Zero is a runtime
        /// error.
        step:  Option<Expr>,
        /// The loop body.
        body:  Vec<Stmt>,
        /// Where the `FOR` appears.
        pos:   Position,
    },
    /// A procedure invocation.
    Call(Call),
    /// Unwinds the enclosing function activation with a value.
    Return {
        /// The returned value.
        expr: Expr,
        /// Where the `RETURN` appears.
        pos:  Position,
    },
    /// Opens a file and enters it into the file table.
    OpenFile {
        /// The `STRING` filename expression.
        filename: Expr,
        /// The requested mode.
        mode:     FileMode,
        /// Where the statement appears.
        pos:      Position,
    },
    /// Reads the next line of an open `READ`-mode file into a place.
    ReadFile {
        /// The `STRING` filename expression.
        filename: Expr,
        /// The storage location written to.
        target:   Place,
        /// The target's scalar type, used for coercion.
        ty:       Type,
        /// Where the statement appears.
        pos:      Position,
    },
    /// Appends one line to an open `WRITE`- or `APPEND`-mode file.
    WriteFile {
        /// The `STRING` filename expression.
        filename: Expr,
        /// The value written, rendered as a line.
        value:    Expr,
        /// Where the statement appears.
        pos:      Position,
    },
    /// Flushes and releases an open file.
    CloseFile {
        /// The `STRING` filename expression.
        filename: Expr,
        /// Where the statement appears.
        pos:      Position,
    },
}

/// A resolved `PROCEDURE` or `FUNCTION`.
#[derive(Debug, Clone)]
pub struct CallableDef {
    /// The declared name.
    pub name: String,
    /// The callable's signature.
    pub sig:  Signature,
    /// The resolved body.
    pub body: Vec<Stmt>,
    /// Where the callable is declared.
    pub pos:  Position,
}

/// A fully resolved program, ready to execute.
#[derive(Debug)]
pub struct Program {
    /// Top-level statements in source order. Callable and type
    /// declarations are hoisted into the registries below.
    pub stmts:     Vec<Stmt>,
    /// User-declared callables by name.
    pub callables: HashMap<String, CallableDef>,
    /// User-declared record types by name.
    pub records:   HashMap<String, RecordDef>,
}
