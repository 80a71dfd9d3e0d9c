use crate::{
    ast::{self, BinaryOperator, PassMode, Position, UnaryOperator},
    error::ResolveError,
    interpreter::{
        builtin::Builtin,
        resolver::core::{ResolveResult, Resolver, literal_type},
        typed::{Arg, Call, Expr, ExprKind, Place, PlaceStep},
        types::Type,
    },
};

fn expect_numeric(expr: &Expr) -> ResolveResult<()> {
    if expr.ty.is_numeric() {
        return Ok(());
    }
    Err(ResolveError::TypeMismatch { expected: "INTEGER or REAL".to_string(),
                                     found:    expr.ty.to_string(),
                                     pos:      expr.pos, })
}

fn expect_boolean(expr: &Expr) -> ResolveResult<()> {
    if expr.ty == Type::Boolean {
        return Ok(());
    }
    Err(ResolveError::TypeMismatch { expected: "BOOLEAN".to_string(),
                                     found:    expr.ty.to_string(),
                                     pos:      expr.pos, })
}

impl Resolver {
    /// Resolves an expression, assigning its type.
    pub(in crate::interpreter::resolver) fn resolve_expr(&mut self,
                                                         expr: &ast::Expr)
                                                         -> ResolveResult<Expr> {
        match expr {
            ast::Expr::Literal { value, pos } => Ok(Expr { kind: ExprKind::Literal(value.clone()),
                                                           ty:   literal_type(value),
                                                           pos:  *pos, }),
            ast::Expr::Name { .. } | ast::Expr::Index { .. } | ast::Expr::Field { .. } => {
                let (place, ty) = self.resolve_place(expr)?;
                Ok(Expr { kind: ExprKind::Load(place),
                          ty,
                          pos: expr.position() })
            },
            ast::Expr::Unary { op, operand, pos } => {
                let operand = self.resolve_expr(operand)?;
                let ty = match op {
                    UnaryOperator::Negate => {
                        expect_numeric(&operand)?;
                        operand.ty.clone()
                    },
                    UnaryOperator::Not => {
                        expect_boolean(&operand)?;
                        Type::Boolean
                    },
                };
                Ok(Expr { kind: ExprKind::Unary { op:      *op,
                                                  operand: Box::new(operand), },
                          ty,
                          pos: *pos })
            },
            ast::Expr::Binary { left, op, right, pos } => self.resolve_binary(left, *op, right,
                                                                              *pos),
            ast::Expr::Call { name, args, pos } => {
                let (call, return_type) = self.resolve_call(name, args, *pos)?;
                let Some(ty) = return_type else {
                    return Err(ResolveError::NotAFunction { name: name.clone(),
                                                            pos:  *pos, });
                };
                Ok(Expr { kind: ExprKind::Call(call),
                          ty,
                          pos: *pos })
            },
        }
    }

    fn resolve_binary(&mut self,
                      left: &ast::Expr,
                      op: BinaryOperator,
                      right: &ast::Expr,
                      pos: Position)
                      -> ResolveResult<Expr> {
        let left = self.resolve_expr(left)?;
        let right = self.resolve_expr(right)?;
        let ty = match op {
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
                expect_numeric(&left)?;
                expect_numeric(&right)?;
                if left.ty == Type::Integer && right.ty == Type::Integer {
                    Type::Integer
                } else {
                    Type::Real
                }
            },
            BinaryOperator::Div => {
                expect_numeric(&left)?;
                expect_numeric(&right)?;
                Type::Real
            },
            BinaryOperator::And | BinaryOperator::Or => {
                expect_boolean(&left)?;
                expect_boolean(&right)?;
                Type::Boolean
            },
            BinaryOperator::Equal | BinaryOperator::NotEqual => {
                let comparable = (left.ty.is_numeric() && right.ty.is_numeric())
                                 || (left.ty == Type::String && right.ty == Type::String)
                                 || (left.ty == Type::Boolean && right.ty == Type::Boolean);
                if !comparable {
                    return Err(ResolveError::TypeMismatch {
                        expected: "matching scalar operand types".to_string(),
                        found:    format!("{} and {}", left.ty, right.ty),
                        pos,
                    });
                }
                Type::Boolean
            },
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => {
                expect_numeric(&left)?;
                expect_numeric(&right)?;
                Type::Boolean
            },
        };
        Ok(Expr { kind: ExprKind::Binary { op,
                                           left: Box::new(left),
                                           right: Box::new(right), },
                  ty,
                  pos })
    }

    /// Resolves a variable reference into a place path and its type.
    ///
    /// The root must be a declared variable; each `[..]` step must index an
    /// array with the right number of `INTEGER` expressions; each `.field`
    /// step must name a field of a record type.
    pub(in crate::interpreter::resolver) fn resolve_place(&mut self,
                                                          expr: &ast::Expr)
                                                          -> ResolveResult<(Place, Type)> {
        match expr {
            ast::Expr::Name { name, pos } => {
                let Some((scope, ty)) = self.lookup_variable(name) else {
                    return Err(ResolveError::Undeclared { name: name.clone(),
                                                          pos:  *pos, });
                };
                let ty = ty.clone();
                Ok((Place { scope,
                            name: name.clone(),
                            steps: Vec::new(),
                            pos: *pos },
                    ty))
            },
            ast::Expr::Index { array, indexes, pos } => {
                let (mut place, ty) = self.resolve_place(array)?;
                let Type::Array(array_ty) = ty else {
                    return Err(ResolveError::TypeMismatch { expected: "an ARRAY".to_string(),
                                                            found:    ty.to_string(),
                                                            pos:      *pos, });
                };
                if indexes.len() != array_ty.bounds.len() {
                    return Err(ResolveError::DimensionMismatch { expected:
                                                                     array_ty.bounds.len(),
                                                                 found:    indexes.len(),
                                                                 pos:      *pos, });
                }
                let mut typed_indexes = Vec::new();
                for index in indexes {
                    let index = self.resolve_expr(index)?;
                    if index.ty != Type::Integer {
                        return Err(ResolveError::TypeMismatch { expected:
                                                                    "an INTEGER index".to_string(),
                                                                found:    index.ty.to_string(),
                                                                pos:      index.pos, });
                    }
                    typed_indexes.push(index);
                }
                place.steps.push(PlaceStep::Index(typed_indexes));
                Ok((place, *array_ty.elem))
            },
            ast::Expr::Field { object, field, pos } => {
                let (mut place, ty) = self.resolve_place(object)?;
                let Type::Record(record_name) = ty else {
                    return Err(ResolveError::TypeMismatch { expected: "a RECORD".to_string(),
                                                            found:    ty.to_string(),
                                                            pos:      *pos, });
                };
                let Some(def) = self.records.get(&record_name) else {
                    return Err(ResolveError::UnknownType { name: record_name,
                                                           pos:  *pos, });
                };
                let Some(field_ty) = def.field_type(field) else {
                    return Err(ResolveError::UnknownField { record: record_name.clone(),
                                                            field:  field.clone(),
                                                            pos:    *pos, });
                };
                let field_ty = field_ty.clone();
                place.steps.push(PlaceStep::Field(field.clone()));
                Ok((place, field_ty))
            },
            other => Err(ResolveError::NotAssignable { pos: other.position() }),
        }
    }

    /// Resolves a call against its signature, classifying each argument by
    /// the parameter's passing mode. Returns the call and its return type
    /// (`None` for procedures).
    pub(in crate::interpreter::resolver) fn resolve_call(
        &mut self,
        name: &str,
        args: &[ast::Expr],
        pos: Position)
        -> ResolveResult<(Call, Option<Type>)> {
        let Some(sig) = self.signatures.get(name).cloned() else {
            return Err(ResolveError::Undeclared { name: name.to_string(),
                                                  pos });
        };
        if args.len() != sig.params.len() {
            return Err(ResolveError::ArityMismatch { name:     name.to_string(),
                                                     expected: sig.params.len(),
                                                     found:    args.len(),
                                                     pos });
        }
        let mut typed_args = Vec::new();
        for (param, arg) in sig.params.iter().zip(args) {
            match param.mode {
                PassMode::ByValue => {
                    let arg = self.resolve_expr(arg)?;
                    if !param.ty.accepts(&arg.ty) {
                        return Err(ResolveError::TypeMismatch { expected: param.ty.to_string(),
                                                                found:    arg.ty.to_string(),
                                                                pos:      arg.pos, });
                    }
                    typed_args.push(Arg::ByValue(arg));
                },
                PassMode::ByReference => {
                    if !matches!(arg,
                                 ast::Expr::Name { .. }
                                 | ast::Expr::Index { .. }
                                 | ast::Expr::Field { .. })
                    {
                        return Err(ResolveError::ByRefArgument { param: param.name.clone(),
                                                                 pos:   arg.position(), });
                    }
                    let (place, ty) = self.resolve_place(arg)?;
                    if ty != param.ty {
                        return Err(ResolveError::TypeMismatch { expected: param.ty.to_string(),
                                                                found:    ty.to_string(),
                                                                pos:      place.pos, });
                    }
                    typed_args.push(Arg::ByReference(place));
                },
            }
        }
        Ok((Call { name:    name.to_string(),
                   builtin: Builtin::lookup(name),
                   args:    typed_args,
                   pos },
            sig.return_type))
    }
}
