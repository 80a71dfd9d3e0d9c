use std::collections::HashMap;

use crate::{
    ast::{self, Position},
    error::ResolveError,
    interpreter::{
        resolver::core::{ResolveResult, Resolver, literal_type},
        typed::{CallableDef, Expr, Place, Stmt},
        types::{ParamSig, RecordDef, Signature, Type},
    },
};

impl Resolver {
    /// Resolves one statement.
    ///
    /// `PROCEDURE`, `FUNCTION` and `TYPE` declarations are registered in
    /// the resolver and produce no executable statement, so they resolve
    /// to `None`; everything else resolves to `Some`.
    pub(in crate::interpreter::resolver) fn resolve_stmt(&mut self,
                                                         stmt: &ast::Stmt)
                                                         -> ResolveResult<Option<Stmt>> {
        match stmt {
            ast::Stmt::TypeDecl { name, fields, pos } => {
                self.resolve_type_decl(name, fields, *pos)?;
                Ok(None)
            },
            ast::Stmt::Procedure(decl) | ast::Stmt::Function(decl) => {
                self.resolve_callable(decl)?;
                Ok(None)
            },
            ast::Stmt::Declare { name, ty, pos } => {
                let ty = self.type_from_name(ty, *pos)?;
                let scope = self.declare_variable(name, ty.clone(), *pos)?;
                Ok(Some(Stmt::Declare { name: name.clone(),
                                        scope,
                                        ty,
                                        pos: *pos }))
            },
            ast::Stmt::Assign { target, value, pos } => {
                let (place, target_ty) = self.resolve_place(target)?;
                let value = self.resolve_expr(value)?;
                if !target_ty.accepts(&value.ty) {
                    return Err(ResolveError::TypeMismatch { expected: target_ty.to_string(),
                                                            found:    value.ty.to_string(),
                                                            pos:      *pos, });
                }
                Ok(Some(Stmt::Assign { target: place,
                                       ty: target_ty,
                                       value,
                                       pos: *pos }))
            },
            ast::Stmt::Output { exprs, pos } => {
                let mut resolved = Vec::new();
                for expr in exprs {
                    let expr = self.resolve_expr(expr)?;
                    if !expr.ty.is_scalar() {
                        return Err(ResolveError::ScalarExpected { found: expr.ty.to_string(),
                                                                  pos:   expr.pos, });
                    }
                    resolved.push(expr);
                }
                Ok(Some(Stmt::Output { exprs: resolved,
                                       pos:   *pos, }))
            },
            ast::Stmt::Input { target, pos } => {
                let (place, ty) = self.resolve_place(target)?;
                if !ty.is_scalar() {
                    return Err(ResolveError::ScalarExpected { found: ty.to_string(),
                                                              pos:   place.pos, });
                }
                Ok(Some(Stmt::Input { target: place,
                                      ty,
                                      pos: *pos }))
            },
            ast::Stmt::If { cond, then_body, else_body, pos } => {
                let cond = self.resolve_condition(cond)?;
                let then_body = self.resolve_block(then_body)?;
                let else_body = self.resolve_block(else_body)?;
                Ok(Some(Stmt::If { cond,
                                   then_body,
                                   else_body,
                                   pos: *pos }))
            },
            ast::Stmt::Case { subject, arms, otherwise, pos } => {
                let subject = self.resolve_expr(subject)?;
                if !subject.ty.is_scalar() {
                    return Err(ResolveError::ScalarExpected { found: subject.ty.to_string(),
                                                              pos:   subject.pos, });
                }
                let mut resolved_arms = Vec::new();
                for arm in arms {
                    let arm_ty = literal_type(&arm.value);
                    if !subject.ty.accepts(&arm_ty) {
                        return Err(ResolveError::TypeMismatch { expected:
                                                                    subject.ty.to_string(),
                                                                found:    arm_ty.to_string(),
                                                                pos:      arm.pos, });
                    }
                    if let Some(body) = self.resolve_stmt(&arm.body)? {
                        resolved_arms.push((arm.value.clone(), body));
                    }
                }
                let otherwise = match otherwise {
                    Some(stmt) => self.resolve_stmt(stmt)?.map(Box::new),
                    None => None,
                };
                Ok(Some(Stmt::Case { subject,
                                     arms: resolved_arms,
                                     otherwise,
                                     pos: *pos }))
            },
            ast::Stmt::While { cond, body, pos } => {
                let cond = self.resolve_condition(cond)?;
                let body = self.resolve_block(body)?;
                Ok(Some(Stmt::While { cond,
                                      body,
                                      pos: *pos }))
            },
            ast::Stmt::Repeat { body, cond, pos } => {
                let body = self.resolve_block(body)?;
                let cond = self.resolve_condition(cond)?;
                Ok(Some(Stmt::Repeat { body,
                                       cond,
                                       pos: *pos }))
            },
            ast::Stmt::For { var, start, stop, step, body, pos } => {
                // An undeclared loop variable is declared implicitly as an
                // INTEGER in the current frame.
                let existing = self.lookup_variable(var)
                                   .map(|(scope, ty)| (scope, ty.clone()));
                let (scope, ty) = match existing {
                    Some(found) => found,
                    None => (self.declare_variable(var, Type::Integer, *pos)?, Type::Integer),
                };
                if ty != Type::Integer {
                    return Err(ResolveError::TypeMismatch { expected: "INTEGER".to_string(),
                                                            found:    ty.to_string(),
                                                            pos:      *pos, });
                }
                let var = Place { scope,
                                  name: var.clone(),
                                  steps: Vec::new(),
                                  pos: *pos };
                let start = self.resolve_integer(start)?;
                let stop = self.resolve_integer(stop)?;
                let step = match step {
                    Some(expr) => Some(self.resolve_integer(expr)?),
                    None => None,
                };
                let body = self.resolve_block(body)?;
                Ok(Some(Stmt::For { var,
                                    start,
                                    stop,
                                    step,
                                    body,
                                    pos: *pos }))
            },
            ast::Stmt::Call { name, args, pos } => {
                let (call, return_type) = self.resolve_call(name, args, *pos)?;
                if return_type.is_some() {
                    return Err(ResolveError::NotAProcedure { name: name.clone(),
                                                             pos:  *pos, });
                }
                Ok(Some(Stmt::Call(call)))
            },
            ast::Stmt::Return { expr, pos } => {
                let Some(return_type) = self.current_return.clone() else {
                    return Err(ResolveError::ReturnOutsideFunction { pos: *pos });
                };
                let expr = self.resolve_expr(expr)?;
                if !return_type.accepts(&expr.ty) {
                    return Err(ResolveError::TypeMismatch { expected: return_type.to_string(),
                                                            found:    expr.ty.to_string(),
                                                            pos:      expr.pos, });
                }
                Ok(Some(Stmt::Return { expr, pos: *pos }))
            },
            ast::Stmt::OpenFile { filename, mode, pos } => {
                let filename = self.resolve_filename(filename)?;
                Ok(Some(Stmt::OpenFile { filename,
                                         mode: *mode,
                                         pos:  *pos, }))
            },
            ast::Stmt::ReadFile { filename, target, pos } => {
                let filename = self.resolve_filename(filename)?;
                let (place, ty) = self.resolve_place(target)?;
                if !ty.is_scalar() {
                    return Err(ResolveError::ScalarExpected { found: ty.to_string(),
                                                              pos:   place.pos, });
                }
                Ok(Some(Stmt::ReadFile { filename,
                                         target: place,
                                         ty,
                                         pos: *pos }))
            },
            ast::Stmt::WriteFile { filename, value, pos } => {
                let filename = self.resolve_filename(filename)?;
                let value = self.resolve_expr(value)?;
                if !value.ty.is_scalar() {
                    return Err(ResolveError::ScalarExpected { found: value.ty.to_string(),
                                                              pos:   value.pos, });
                }
                Ok(Some(Stmt::WriteFile { filename,
                                          value,
                                          pos: *pos }))
            },
            ast::Stmt::CloseFile { filename, pos } => {
                let filename = self.resolve_filename(filename)?;
                Ok(Some(Stmt::CloseFile { filename,
                                          pos: *pos }))
            },
        }
    }

    /// Resolves the statements of a block in order.
    pub(in crate::interpreter::resolver) fn resolve_block(
        &mut self,
        stmts: &[ast::Stmt])
        -> ResolveResult<Vec<Stmt>> {
        let mut resolved = Vec::new();
        for stmt in stmts {
            if let Some(stmt) = self.resolve_stmt(stmt)? {
                resolved.push(stmt);
            }
        }
        Ok(resolved)
    }

    fn resolve_condition(&mut self, cond: &ast::Expr) -> ResolveResult<Expr> {
        let cond = self.resolve_expr(cond)?;
        if cond.ty != Type::Boolean {
            return Err(ResolveError::TypeMismatch { expected: "BOOLEAN".to_string(),
                                                    found:    cond.ty.to_string(),
                                                    pos:      cond.pos, });
        }
        Ok(cond)
    }

    fn resolve_integer(&mut self, expr: &ast::Expr) -> ResolveResult<Expr> {
        let expr = self.resolve_expr(expr)?;
        if expr.ty != Type::Integer {
            return Err(ResolveError::TypeMismatch { expected: "INTEGER".to_string(),
                                                    found:    expr.ty.to_string(),
                                                    pos:      expr.pos, });
        }
        Ok(expr)
    }

    fn resolve_filename(&mut self, expr: &ast::Expr) -> ResolveResult<Expr> {
        let expr = self.resolve_expr(expr)?;
        if expr.ty != Type::String {
            return Err(ResolveError::TypeMismatch { expected: "a STRING filename".to_string(),
                                                    found:    expr.ty.to_string(),
                                                    pos:      expr.pos, });
        }
        Ok(expr)
    }

    /// Registers a record type declared with `TYPE ... ENDTYPE`.
    fn resolve_type_decl(&mut self,
                         name: &str,
                         fields: &[ast::FieldDecl],
                         pos: Position)
                         -> ResolveResult<()> {
        if self.records.contains_key(name) {
            return Err(ResolveError::Redeclared { name: name.to_string(),
                                                  pos });
        }
        let mut resolved: Vec<(String, Type)> = Vec::new();
        for field in fields {
            if matches!(field.ty, ast::TypeName::Array { .. }) {
                return Err(ResolveError::FieldTypeUnsupported { pos: field.pos });
            }
            let ty = self.type_from_name(&field.ty, field.pos)?;
            if resolved.iter().any(|(existing, _)| existing == &field.name) {
                return Err(ResolveError::DuplicateField { field: field.name.clone(),
                                                          pos:   field.pos, });
            }
            resolved.push((field.name.clone(), ty));
        }
        self.records.insert(name.to_string(),
                            RecordDef { name:   name.to_string(),
                                        fields: resolved, });
        Ok(())
    }

    /// Registers and verifies a `PROCEDURE` or `FUNCTION`.
    ///
    /// The signature is registered before the body resolves, so the body
    /// may call the callable recursively. Identifiers declared in the body
    /// shadow globals for its remainder.
    fn resolve_callable(&mut self, decl: &ast::CallableDecl) -> ResolveResult<()> {
        if self.signatures.contains_key(&decl.name) || self.globals.contains_key(&decl.name) {
            return Err(ResolveError::Redeclared { name: decl.name.clone(),
                                                  pos:  decl.pos, });
        }
        let mut params = Vec::new();
        let mut locals = HashMap::new();
        for param in &decl.params {
            let ty = self.type_from_name(&param.ty, param.pos)?;
            if locals.insert(param.name.clone(), ty.clone()).is_some() {
                return Err(ResolveError::Redeclared { name: param.name.clone(),
                                                      pos:  param.pos, });
            }
            params.push(ParamSig { name: param.name.clone(),
                                   ty,
                                   mode: param.mode });
        }
        let return_type = match &decl.return_type {
            Some(ty) => {
                let ty = self.type_from_name(ty, decl.pos)?;
                if !ty.is_scalar() {
                    return Err(ResolveError::ScalarExpected { found: ty.to_string(),
                                                              pos:   decl.pos, });
                }
                Some(ty)
            },
            None => None,
        };
        let sig = Signature { params,
                              return_type: return_type.clone() };
        self.signatures.insert(decl.name.clone(), sig.clone());

        self.locals = Some(locals);
        self.current_return = return_type;
        let body = self.resolve_block(&decl.body);
        self.locals = None;
        self.current_return = None;
        let body = body?;

        if decl.return_type.is_some() && !always_returns(&body) {
            return Err(ResolveError::MissingReturn { name: decl.name.clone(),
                                                     pos:  decl.pos, });
        }
        self.callables.insert(decl.name.clone(),
                              CallableDef { name: decl.name.clone(),
                                            sig,
                                            body,
                                            pos: decl.pos });
        Ok(())
    }
}

/// Returns `true` when every control path through the block reaches a
/// `RETURN`.
fn always_returns(stmts: &[Stmt]) -> bool {
    stmts.iter().any(stmt_returns)
}

fn stmt_returns(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return { .. } => true,
        Stmt::If { then_body, else_body, .. } => {
            !else_body.is_empty() && always_returns(then_body) && always_returns(else_body)
        },
        Stmt::Case { arms, otherwise, .. } => {
            otherwise.as_deref().is_some_and(stmt_returns)
            && arms.iter().all(|(_, body)| stmt_returns(body))
        },
        // A REPEAT body runs at least once; WHILE and FOR may run zero
        // times.
        Stmt::Repeat { body, .. } => always_returns(body),
        _ => false,
    }
}
