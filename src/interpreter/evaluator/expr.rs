use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{BinaryOperator, Position, UnaryOperator},
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        builtin::{self, Builtin},
        evaluator::core::{Context, EvalResult, Flow, coerce},
        frame::Frame,
        typed::{Arg, Call, Expr, ExprKind},
        value::Value,
    },
};

impl Context<'_, '_> {
    /// Evaluates a resolved expression to a value.
    ///
    /// The resolver has already fixed every expression's type, so only
    /// representation-level work happens here: arithmetic with the
    /// INTEGER-to-REAL widening rules, lexicographic string equality, and
    /// short-circuit `AND`/`OR`.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Value::from(literal)),
            ExprKind::Load(place) => {
                let value = self.read_place(place)?;
                if value.is_null() {
                    return Err(RuntimeError::new(RuntimeErrorKind::UnassignedVariable {
                        name: place.name.clone(),
                    },
                                                 place.pos));
                }
                Ok(value)
            },
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr.pos),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right, expr.pos),
            ExprKind::Call(call) => match self.eval_call(call)? {
                Some(value) => Ok(value),
                None => Err(RuntimeError::new(RuntimeErrorKind::MissingReturnValue {
                    name: call.name.clone(),
                },
                                              call.pos)),
            },
        }
    }

    fn eval_unary(&mut self, op: UnaryOperator, operand: &Expr, pos: Position) -> EvalResult<Value> {
        let value = self.eval_expr(operand)?;
        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(n) => {
                    n.checked_neg()
                     .map(Value::Integer)
                     .ok_or_else(|| RuntimeError::new(RuntimeErrorKind::Overflow, pos))
                },
                Value::Real(r) => Ok(Value::Real(-r)),
                _ => Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected:
                                                                                  "a numeric value" },
                                           pos)),
            },
            UnaryOperator::Not => Ok(Value::Boolean(!value.as_boolean(operand.pos)?)),
        }
    }

    fn eval_binary(&mut self,
                   op: BinaryOperator,
                   left: &Expr,
                   right: &Expr,
                   pos: Position)
                   -> EvalResult<Value> {
        match op {
            // AND and OR short-circuit: the right operand only runs when
            // the left leaves the answer open.
            BinaryOperator::And => {
                if !self.eval_expr(left)?.as_boolean(left.pos)? {
                    return Ok(Value::Boolean(false));
                }
                Ok(Value::Boolean(self.eval_expr(right)?.as_boolean(right.pos)?))
            },
            BinaryOperator::Or => {
                if self.eval_expr(left)?.as_boolean(left.pos)? {
                    return Ok(Value::Boolean(true));
                }
                Ok(Value::Boolean(self.eval_expr(right)?.as_boolean(right.pos)?))
            },
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                if let (Value::Integer(a), Value::Integer(b)) = (&lhs, &rhs) {
                    let result = match op {
                        BinaryOperator::Add => a.checked_add(*b),
                        BinaryOperator::Sub => a.checked_sub(*b),
                        _ => a.checked_mul(*b),
                    };
                    return result.map(Value::Integer)
                                 .ok_or_else(|| {
                                     RuntimeError::new(RuntimeErrorKind::Overflow, pos)
                                 });
                }
                let a = lhs.as_real(left.pos)?;
                let b = rhs.as_real(right.pos)?;
                Ok(Value::Real(match op {
                    BinaryOperator::Add => a + b,
                    BinaryOperator::Sub => a - b,
                    _ => a * b,
                }))
            },
            BinaryOperator::Div => {
                let a = self.eval_expr(left)?.as_real(left.pos)?;
                let b = self.eval_expr(right)?.as_real(right.pos)?;
                if b == 0.0 {
                    return Err(RuntimeError::new(RuntimeErrorKind::DivisionByZero, pos));
                }
                Ok(Value::Real(a / b))
            },
            BinaryOperator::Equal | BinaryOperator::NotEqual => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                let equal = values_equal(&lhs, &rhs, pos)?;
                Ok(Value::Boolean(if op == BinaryOperator::Equal {
                                      equal
                                  } else {
                                      !equal
                                  }))
            },
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                if let (Value::Integer(a), Value::Integer(b)) = (&lhs, &rhs) {
                    return Ok(Value::Boolean(match op {
                        BinaryOperator::Less => a < b,
                        BinaryOperator::Greater => a > b,
                        BinaryOperator::LessEqual => a <= b,
                        _ => a >= b,
                    }));
                }
                let a = lhs.as_real(left.pos)?;
                let b = rhs.as_real(right.pos)?;
                Ok(Value::Boolean(match op {
                    BinaryOperator::Less => a < b,
                    BinaryOperator::Greater => a > b,
                    BinaryOperator::LessEqual => a <= b,
                    _ => a >= b,
                }))
            },
        }
    }

    /// Invokes a callable and returns its result: `Some` for functions,
    /// `None` for procedures.
    ///
    /// A fresh activation frame is created, parented (lexically) on the
    /// global frame. `BYVALUE` arguments are copied into new slots;
    /// `BYREF` arguments alias the caller's storage location. A `RETURN`
    /// in the body unwinds the activation immediately.
    pub(in crate::interpreter::evaluator) fn eval_call(&mut self,
                                                       call: &Call)
                                                       -> EvalResult<Option<Value>> {
        if let Some(builtin) = call.builtin {
            let mut values = Vec::with_capacity(call.args.len());
            for arg in &call.args {
                match arg {
                    Arg::ByValue(expr) => values.push(self.eval_expr(expr)?),
                    Arg::ByReference(_) => {
                        return Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType {
                            expected: "a BYVALUE argument",
                        },
                                                     call.pos));
                    },
                }
            }
            return self.call_builtin(builtin, &values, call.pos).map(Some);
        }

        let program = self.program;
        let Some(def) = program.callables.get(&call.name) else {
            return Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected:
                                                                                "a declared callable" },
                                         call.pos));
        };

        let mut activation = Frame::new();
        for (param, arg) in def.sig.params.iter().zip(&call.args) {
            match arg {
                Arg::ByValue(expr) => {
                    let value = self.eval_expr(expr)?;
                    let value = coerce(value, &param.ty, expr.pos)?;
                    activation.declare(&param.name, param.ty.clone(), value);
                },
                Arg::ByReference(place) => {
                    let binding = self.binding_for(place)?;
                    activation.bind(&param.name, binding);
                },
            }
        }

        let saved = self.locals.replace(Rc::new(RefCell::new(activation)));
        let flow = self.exec_block(&def.body);
        self.locals = saved;
        let flow = flow.map_err(|e| e.in_callable(&def.name))?;

        match flow {
            Flow::Return(value) => match &def.sig.return_type {
                Some(return_type) => Ok(Some(coerce(value, return_type, call.pos)?)),
                None => Ok(Some(value)),
            },
            Flow::Normal => Ok(None),
        }
    }

    fn call_builtin(&mut self,
                    builtin: Builtin,
                    args: &[Value],
                    pos: Position)
                    -> EvalResult<Value> {
        match (builtin, args) {
            (Builtin::Eof, [name]) => {
                let name = name.as_str(pos)?.to_string();
                self.file_eof(&name, pos).map(Value::Boolean)
            },
            (Builtin::Int, [x]) => builtin::int(x.as_real(pos)?, pos),
            (Builtin::Mid, [s, start, len]) => {
                builtin::mid(s.as_str(pos)?, start.as_integer(pos)?, len.as_integer(pos)?, pos)
            },
            (Builtin::Length, [s]) => Ok(builtin::length(s.as_str(pos)?)),
            (Builtin::Left, [s, n]) => builtin::left(s.as_str(pos)?, n.as_integer(pos)?, pos),
            (Builtin::Right, [s, n]) => builtin::right(s.as_str(pos)?, n.as_integer(pos)?, pos),
            (Builtin::Asc, [s]) => builtin::asc(s.as_str(pos)?, pos),
            (Builtin::RandomBetween, [a, b]) => {
                builtin::random_between(a.as_integer(pos)?, b.as_integer(pos)?, pos)
            },
            (Builtin::Rnd, []) => Ok(builtin::rnd()),
            _ => Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType {
                expected: "arguments matching the built-in's signature",
            },
                                       pos)),
        }
    }
}

/// Compares two values for equality, treating mixed INTEGER/REAL pairs as
/// numbers.
pub(in crate::interpreter::evaluator) fn values_equal(lhs: &Value,
                                                      rhs: &Value,
                                                      pos: Position)
                                                      -> EvalResult<bool> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        _ => Ok(lhs.as_real(pos)? == rhs.as_real(pos)?),
    }
}
