use crate::{
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow, coerce, coerce_input},
            expr::values_equal,
        },
        typed::Stmt,
        types::Type,
        value::{Value, default_value},
    },
};

impl Context<'_, '_> {
    /// Executes one resolved statement.
    pub(in crate::interpreter::evaluator) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Declare { name, scope, ty, .. } => {
                let value = default_value(ty, &self.program.records);
                let frame = self.frame(*scope);
                frame.borrow_mut().declare(name, ty.clone(), value);
                Ok(Flow::Normal)
            },
            Stmt::Assign { target, ty, value, pos } => {
                let value = self.eval_expr(value)?;
                let value = coerce(value, ty, *pos)?;
                self.write_place(target, value)?;
                Ok(Flow::Normal)
            },
            Stmt::Output { exprs, .. } => {
                let mut line = String::new();
                for expr in exprs {
                    let value = self.eval_expr(expr)?;
                    line.push_str(&value.to_string());
                }
                line.push('\n');
                self.io.write(&line);
                Ok(Flow::Normal)
            },
            Stmt::Input { target, ty, pos } => {
                let line = self.io
                               .read_line()
                               .ok_or_else(|| {
                                   RuntimeError::new(RuntimeErrorKind::EndOfInput, *pos)
                               })?;
                let value = coerce_input(&line, ty, *pos)?;
                self.write_place(target, value)?;
                Ok(Flow::Normal)
            },
            Stmt::If { cond, then_body, else_body, .. } => {
                if self.eval_expr(cond)?.as_boolean(cond.pos)? {
                    self.exec_block(then_body)
                } else {
                    self.exec_block(else_body)
                }
            },
            Stmt::Case { subject, arms, otherwise, .. } => {
                let subject_value = self.eval_expr(subject)?;
                for (literal, body) in arms {
                    let arm_value = Value::from(literal);
                    if values_equal(&subject_value, &arm_value, subject.pos)? {
                        return self.exec_stmt(body);
                    }
                }
                match otherwise {
                    Some(body) => self.exec_stmt(body),
                    None => Ok(Flow::Normal),
                }
            },
            Stmt::While { cond, body, .. } => {
                while self.eval_expr(cond)?.as_boolean(cond.pos)? {
                    if let Flow::Return(value) = self.exec_block(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            },
            Stmt::Repeat { body, cond, .. } => {
                loop {
                    if let Flow::Return(value) = self.exec_block(body)? {
                        return Ok(Flow::Return(value));
                    }
                    if self.eval_expr(cond)?.as_boolean(cond.pos)? {
                        return Ok(Flow::Normal);
                    }
                }
            },
            Stmt::For { var, start, stop, step, body, pos } => {
                // Start, stop and step are computed once at entry. The
                // loop variable itself is re-read every iteration, so
                // assignments to it inside the body take part in the
                // loop's progress.
                let start_value = self.eval_expr(start)?.as_integer(start.pos)?;
                let stop_value = self.eval_expr(stop)?.as_integer(stop.pos)?;
                let step_value = match step {
                    Some(expr) => self.eval_expr(expr)?.as_integer(expr.pos)?,
                    None => 1,
                };
                if step_value == 0 {
                    return Err(RuntimeError::new(RuntimeErrorKind::ZeroStep, *pos));
                }
                // An implicitly declared loop variable gets its slot here.
                let frame = self.frame(var.scope);
                if frame.borrow().binding(&var.name).is_none() {
                    frame.borrow_mut()
                         .declare(&var.name, Type::Integer, Value::Null);
                }
                self.write_place(var, Value::Integer(start_value))?;
                loop {
                    let current = self.read_place(var)?.as_integer(var.pos)?;
                    let continues = if step_value > 0 {
                        current <= stop_value
                    } else {
                        current >= stop_value
                    };
                    if !continues {
                        break;
                    }
                    if let Flow::Return(value) = self.exec_block(body)? {
                        return Ok(Flow::Return(value));
                    }
                    let current = self.read_place(var)?.as_integer(var.pos)?;
                    let Some(next) = current.checked_add(step_value) else {
                        return Err(RuntimeError::new(RuntimeErrorKind::Overflow, *pos));
                    };
                    self.write_place(var, Value::Integer(next))?;
                }
                Ok(Flow::Normal)
            },
            Stmt::Call(call) => {
                self.eval_call(call)?;
                Ok(Flow::Normal)
            },
            Stmt::Return { expr, .. } => {
                let value = self.eval_expr(expr)?;
                Ok(Flow::Return(value))
            },
            Stmt::OpenFile { filename, mode, pos } => {
                self.exec_open_file(filename, *mode, *pos)?;
                Ok(Flow::Normal)
            },
            Stmt::ReadFile { filename, target, ty, pos } => {
                self.exec_read_file(filename, target, ty, *pos)?;
                Ok(Flow::Normal)
            },
            Stmt::WriteFile { filename, value, pos } => {
                self.exec_write_file(filename, value, *pos)?;
                Ok(Flow::Normal)
            },
            Stmt::CloseFile { filename, pos } => {
                self.exec_close_file(filename, *pos)?;
                Ok(Flow::Normal)
            },
        }
    }
}
