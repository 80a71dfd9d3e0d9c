use std::{cell::RefCell, rc::Rc};

use log::debug;

use crate::{
    ast::Position,
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::file::FileTable,
        frame::{self, Binding, Frame, ResolvedStep},
        io::HostIo,
        typed::{Place, PlaceStep, Program, Scope, Stmt},
        types::Type,
        value::Value,
    },
    util::num::i64_to_f64_checked,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// [`RuntimeError`] describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The control-flow signal threaded through statement execution.
///
/// `RETURN` unwinds arbitrarily deep statement nesting by travelling up
/// through this value rather than through host-language exceptions.
#[derive(Debug)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `RETURN` is unwinding the enclosing activation with this value.
    Return(Value),
}

/// The runtime execution state.
///
/// Holds the global frame, the current activation frame (if any), the file
/// table, and the host I/O adapter. One `Context` executes one resolved
/// [`Program`] from start to finish.
pub struct Context<'p, 'io> {
    pub(in crate::interpreter::evaluator) program: &'p Program,
    pub(in crate::interpreter::evaluator) globals: Rc<RefCell<Frame>>,
    pub(in crate::interpreter::evaluator) locals:  Option<Rc<RefCell<Frame>>>,
    pub(in crate::interpreter::evaluator) files:   FileTable,
    pub(in crate::interpreter::evaluator) io:      &'io mut dyn HostIo,
}

impl<'p, 'io> Context<'p, 'io> {
    /// Creates a context for a resolved program over a host adapter.
    pub fn new(program: &'p Program, io: &'io mut dyn HostIo) -> Self {
        Self { program,
               globals: Rc::new(RefCell::new(Frame::new())),
               locals: None,
               files: FileTable::new(),
               io }
    }

    /// Executes the program's statements in order.
    ///
    /// Files still open when execution finishes (normally or not) are
    /// released.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised.
    pub fn run(&mut self) -> EvalResult<()> {
        debug!("executing {} top-level statements", self.program.stmts.len());
        let program = self.program;
        let result = self.exec_block(&program.stmts);
        self.close_open_files();
        result.map(|_| ())
    }

    /// Executes a block, propagating a `RETURN` upward as soon as one
    /// occurs.
    pub(in crate::interpreter::evaluator) fn exec_block(&mut self,
                                                        stmts: &[Stmt])
                                                        -> EvalResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// The frame a scope refers to right now.
    pub(in crate::interpreter::evaluator) fn frame(&self, scope: Scope) -> Rc<RefCell<Frame>> {
        match scope {
            Scope::Global => Rc::clone(&self.globals),
            Scope::Local => {
                self.locals
                    .as_ref()
                    .map_or_else(|| Rc::clone(&self.globals), Rc::clone)
            },
        }
    }

    /// Evaluates the index expressions of a place path, producing steps
    /// that can be walked without running further user code.
    pub(in crate::interpreter::evaluator) fn resolve_steps(
        &mut self,
        steps: &[PlaceStep])
        -> EvalResult<Vec<ResolvedStep>> {
        let mut resolved = Vec::with_capacity(steps.len());
        for step in steps {
            match step {
                PlaceStep::Index(exprs) => {
                    let mut indexes = Vec::with_capacity(exprs.len());
                    for expr in exprs {
                        indexes.push(self.eval_expr(expr)?.as_integer(expr.pos)?);
                    }
                    resolved.push(ResolvedStep::Index(indexes));
                },
                PlaceStep::Field(name) => resolved.push(ResolvedStep::Field(name.clone())),
            }
        }
        Ok(resolved)
    }

    fn root_binding(&mut self, place: &Place) -> EvalResult<Binding> {
        self.frame(place.scope)
            .borrow()
            .binding(&place.name)
            .ok_or_else(|| {
                RuntimeError::new(RuntimeErrorKind::UnassignedVariable { name:
                                                                             place.name.clone(), },
                                  place.pos)
            })
    }

    /// Reads the value a place refers to.
    pub(in crate::interpreter::evaluator) fn read_place(&mut self,
                                                        place: &Place)
                                                        -> EvalResult<Value> {
        let steps = self.resolve_steps(&place.steps)?;
        let binding = self.root_binding(place)?;
        frame::read_binding(&binding, &steps, place.pos)
    }

    /// Writes a value through a place.
    pub(in crate::interpreter::evaluator) fn write_place(&mut self,
                                                         place: &Place,
                                                         value: Value)
                                                         -> EvalResult<()> {
        let steps = self.resolve_steps(&place.steps)?;
        let binding = self.root_binding(place)?;
        frame::write_binding(&binding, &steps, value, place.pos)
    }

    /// Produces the binding a `BYREF` parameter receives for this place:
    /// the argument's storage location, with index expressions evaluated
    /// now and frozen for the callable's lifetime.
    pub(in crate::interpreter::evaluator) fn binding_for(&mut self,
                                                         place: &Place)
                                                         -> EvalResult<Binding> {
        let steps = self.resolve_steps(&place.steps)?;
        let root = self.root_binding(place)?;
        Ok(frame::project_binding(root, steps))
    }
}

/// Widens a value to the target type where the single permitted widening
/// (INTEGER to REAL) applies; all other values pass through unchanged.
pub(in crate::interpreter::evaluator) fn coerce(value: Value,
                                                ty: &Type,
                                                pos: Position)
                                                -> EvalResult<Value> {
    match (ty, &value) {
        (Type::Real, Value::Integer(n)) => {
            let real = i64_to_f64_checked(*n, RuntimeError::new(RuntimeErrorKind::Overflow, pos))?;
            Ok(Value::Real(real))
        },
        _ => Ok(value),
    }
}

/// Converts one line of console or file input into the target's type.
pub(in crate::interpreter::evaluator) fn coerce_input(line: &str,
                                                      ty: &Type,
                                                      pos: Position)
                                                      -> EvalResult<Value> {
    let fail = |expected: &'static str| {
        RuntimeError::new(RuntimeErrorKind::InputCoercion { expected,
                                                            line: line.to_string() },
                          pos)
    };
    match ty {
        Type::Integer => {
            line.trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| fail("INTEGER"))
        },
        Type::Real => {
            line.trim()
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| fail("REAL"))
        },
        Type::Boolean => match line.trim() {
            "TRUE" => Ok(Value::Boolean(true)),
            "FALSE" => Ok(Value::Boolean(false)),
            _ => Err(fail("BOOLEAN")),
        },
        Type::String => Ok(Value::Str(line.to_string())),
        Type::Array(_) | Type::Record(_) => {
            Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected:
                                                                         "a scalar input target" },
                                  pos))
        },
    }
}
