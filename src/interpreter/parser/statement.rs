use crate::{
    ast::{
        CallableDecl, CaseArm, FieldDecl, FileMode, Literal, Param, PassMode, Position, Stmt,
        TypeName,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

/// Parses a scanned token sequence into a list of statements.
///
/// This is the entry point for parsing. Statements are separated by
/// newlines; blank lines between statements are skipped.
///
/// # Errors
/// Returns a [`ParseError`] for the first construct that does not follow
/// the grammar.
///
/// # Example
/// ```
/// use pseudo9608::interpreter::{lexer::scan, parser::statement::parse_program};
///
/// let tokens = scan("DECLARE x : INTEGER\nx <- 7\n").unwrap();
/// let program = parse_program(&tokens).unwrap();
/// assert_eq!(program.len(), 2);
/// ```
pub fn parse_program(tokens: &[(Token, Position)]) -> Result<Vec<Stmt>, ParseError> {
    let mut parser = Parser::new(tokens);
    let mut stmts = Vec::new();
    loop {
        parser.skip_newlines();
        if parser.peek().is_none() {
            break;
        }
        stmts.push(parser.parse_statement()?);
    }
    Ok(stmts)
}

// Statements are detected from the keyword opening the line. Lines that
// begin with a name are assignments.
//
// The grammar has three statement tiers:
// 1. top level: everything, including PROCEDURE/FUNCTION/TYPE declarations
// 2. block bodies: everything except those declarations
// 3. CASE arms: single simple statements (plus RETURN)
impl Parser<'_> {
    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Some((Token::Procedure, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_procedure(pos)
            },
            Some((Token::Function, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_function(pos)
            },
            Some((Token::Type, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_type_decl(pos)
            },
            _ => self.parse_block_statement(),
        }
    }

    fn parse_block_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Some((Token::Declare, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_declare(pos)
            },
            Some((Token::Return, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_return(pos)
            },
            Some((Token::If, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_if(pos)
            },
            Some((Token::Case, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_case(pos)
            },
            Some((Token::While, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_while(pos)
            },
            Some((Token::Repeat, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_repeat(pos)
            },
            Some((Token::For, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_for(pos)
            },
            Some((token @ (Token::Procedure | Token::Function | Token::Type), pos)) => {
                Err(ParseError::UnexpectedToken {
                    expected: "a statement; PROCEDURE, FUNCTION and TYPE declarations belong at \
                               the top level"
                                                 .to_string(),
                    found:    token.to_string(),
                    pos:      *pos,
                })
            },
            _ => self.parse_simple_statement(),
        }
    }

    /// The simple statements allowed as `CASE` arms: output, input, calls,
    /// assignment, the file statements, and `RETURN`.
    fn parse_simple_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Some((Token::Output, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_output(pos)
            },
            Some((Token::Input, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_input(pos)
            },
            Some((Token::Call, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_call(pos)
            },
            Some((Token::Return, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_return(pos)
            },
            Some((Token::OpenFile, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_open_file(pos)
            },
            Some((Token::ReadFile, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_read_file(pos)
            },
            Some((Token::WriteFile, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_write_file(pos)
            },
            Some((Token::CloseFile, pos)) => {
                let pos = *pos;
                self.advance();
                self.parse_close_file(pos)
            },
            Some((Token::Identifier(_), _)) => self.parse_assign(),
            Some((token, pos)) => Err(ParseError::ExpectedStatement { found: token.to_string(),
                                                                      pos:   *pos, }),
            None => Err(ParseError::UnexpectedEndOfInput { pos: self.last_pos }),
        }
    }

    /// Parses statements up to (but not consuming) one of the given
    /// terminator tokens.
    fn parse_block(&mut self, terminators: &[Token]) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                None => return Err(ParseError::UnexpectedEndOfInput { pos: self.last_pos }),
                Some((token, _)) if terminators.contains(token) => break,
                _ => stmts.push(self.parse_block_statement()?),
            }
        }
        Ok(stmts)
    }

    /// `DECLARE <name> : <type>`
    fn parse_declare(&mut self, pos: Position) -> ParseResult<Stmt> {
        let (name, _) = self.expect_identifier("a variable name after DECLARE")?;
        self.expect(&Token::Colon, "':' after the variable name")?;
        let ty = self.parse_type_name()?;
        self.expect_newline("after the declaration")?;
        Ok(Stmt::Declare { name, ty, pos })
    }

    fn parse_type_name(&mut self) -> ParseResult<TypeName> {
        match self.peek() {
            Some((Token::IntegerType, _)) => {
                self.advance();
                Ok(TypeName::Integer)
            },
            Some((Token::RealType, _)) => {
                self.advance();
                Ok(TypeName::Real)
            },
            Some((Token::StringType, _)) => {
                self.advance();
                Ok(TypeName::String)
            },
            Some((Token::BooleanType, _)) => {
                self.advance();
                Ok(TypeName::Boolean)
            },
            Some((Token::Array, _)) => {
                self.advance();
                self.expect(&Token::LBracket, "'[' after ARRAY")?;
                let mut bounds = Vec::new();
                loop {
                    let lo = self.parse_bound()?;
                    self.expect(&Token::Colon, "':' in an array bound")?;
                    let hi = self.parse_bound()?;
                    bounds.push((lo, hi));
                    if !self.match_token(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RBracket, "']' after the array bounds")?;
                self.expect(&Token::Of, "'OF' after the array bounds")?;
                let elem = Box::new(self.parse_type_name()?);
                Ok(TypeName::Array { bounds, elem })
            },
            Some((Token::Identifier(name), _)) => {
                let name = name.clone();
                self.advance();
                Ok(TypeName::Named(name))
            },
            _ => Err(self.unexpected("a type name")),
        }
    }

    /// An array bound: an integer literal with an optional leading minus.
    fn parse_bound(&mut self) -> ParseResult<i64> {
        let negative = self.match_token(&Token::Minus);
        match self.peek() {
            Some((Token::Integer(n), _)) => {
                let n = *n;
                self.advance();
                Ok(if negative { -n } else { n })
            },
            _ => Err(self.unexpected("an INTEGER array bound")),
        }
    }

    /// `TYPE <name> ... ENDTYPE`, with one `DECLARE` per field line.
    fn parse_type_decl(&mut self, pos: Position) -> ParseResult<Stmt> {
        let (name, _) = self.expect_identifier("a type name after TYPE")?;
        self.expect_newline("after the type name")?;
        let mut fields = Vec::new();
        loop {
            self.skip_newlines();
            if self.match_token(&Token::EndType) {
                break;
            }
            self.expect(&Token::Declare, "'DECLARE' or 'ENDTYPE' in a TYPE block")?;
            let (field_name, field_pos) = self.expect_identifier("a field name after DECLARE")?;
            self.expect(&Token::Colon, "':' after the field name")?;
            let ty = self.parse_type_name()?;
            self.expect_newline("after the field declaration")?;
            fields.push(FieldDecl { name: field_name,
                                    ty,
                                    pos: field_pos });
        }
        self.expect_newline("after ENDTYPE")?;
        Ok(Stmt::TypeDecl { name, fields, pos })
    }

    /// `<target> <- <value>`
    fn parse_assign(&mut self) -> ParseResult<Stmt> {
        let target = self.parse_variable_reference()?;
        let pos = self.expect(&Token::Assign, "'<-' after the assignment target")?;
        let value = self.parse_expression()?;
        self.expect_newline("after the assignment")?;
        Ok(Stmt::Assign { target, value, pos })
    }

    /// `OUTPUT <expr>, <expr>, ...`
    fn parse_output(&mut self, pos: Position) -> ParseResult<Stmt> {
        let mut exprs = vec![self.parse_expression()?];
        while self.match_token(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        self.expect_newline("after OUTPUT")?;
        Ok(Stmt::Output { exprs, pos })
    }

    /// `INPUT <target>`
    fn parse_input(&mut self, pos: Position) -> ParseResult<Stmt> {
        let target = self.parse_variable_reference()?;
        self.expect_newline("after INPUT")?;
        Ok(Stmt::Input { target, pos })
    }

    /// `IF <cond> [newline] THEN ... [ELSE ...] ENDIF`
    fn parse_if(&mut self, pos: Position) -> ParseResult<Stmt> {
        let cond = self.parse_expression()?;
        self.match_token(&Token::Newline);
        self.expect(&Token::Then, "'THEN' after the IF condition")?;
        self.expect_newline("after THEN")?;
        let then_body = self.parse_block(&[Token::Else, Token::EndIf])?;
        let else_body = if self.match_token(&Token::Else) {
            self.expect_newline("after ELSE")?;
            self.parse_block(&[Token::EndIf])?
        } else {
            Vec::new()
        };
        self.expect(&Token::EndIf, "'ENDIF' at the end of IF")?;
        self.expect_newline("after ENDIF")?;
        Ok(Stmt::If { cond,
                      then_body,
                      else_body,
                      pos })
    }

    /// `CASE OF <subject> ... [OTHERWISE ...] ENDCASE`
    fn parse_case(&mut self, pos: Position) -> ParseResult<Stmt> {
        self.expect(&Token::Of, "'OF' after CASE")?;
        let subject = self.parse_value()?;
        self.expect_newline("after the CASE subject")?;
        let mut arms = Vec::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), Some((Token::Otherwise | Token::EndCase, _))) {
                break;
            }
            let (value, arm_pos) = self.parse_case_literal()?;
            self.expect(&Token::Colon, "':' after the CASE value")?;
            let body = Box::new(self.parse_simple_statement()?);
            arms.push(CaseArm { value,
                                body,
                                pos: arm_pos });
        }
        let otherwise = if self.match_token(&Token::Otherwise) {
            self.match_token(&Token::Colon);
            Some(Box::new(self.parse_simple_statement()?))
        } else {
            None
        };
        self.skip_newlines();
        self.expect(&Token::EndCase, "'ENDCASE' at the end of CASE")?;
        self.skip_trailing_identifier();
        self.expect_newline("after ENDCASE")?;
        Ok(Stmt::Case { subject,
                        arms,
                        otherwise,
                        pos })
    }

    fn parse_case_literal(&mut self) -> ParseResult<(Literal, Position)> {
        match self.peek() {
            Some((Token::Integer(n), pos)) => {
                let result = (Literal::Integer(*n), *pos);
                self.advance();
                Ok(result)
            },
            Some((Token::Real(r), pos)) => {
                let result = (Literal::Real(*r), *pos);
                self.advance();
                Ok(result)
            },
            Some((Token::Str(s), pos)) => {
                let result = (Literal::Str(s.clone()), *pos);
                self.advance();
                Ok(result)
            },
            Some((Token::Boolean(b), pos)) => {
                let result = (Literal::Boolean(*b), *pos);
                self.advance();
                Ok(result)
            },
            _ => Err(self.unexpected("a literal CASE value")),
        }
    }

    /// `WHILE <cond> DO ... ENDWHILE`
    fn parse_while(&mut self, pos: Position) -> ParseResult<Stmt> {
        let cond = self.parse_expression()?;
        self.expect(&Token::Do, "'DO' after the WHILE condition")?;
        self.expect_newline("after DO")?;
        let body = self.parse_block(&[Token::EndWhile])?;
        self.expect(&Token::EndWhile, "'ENDWHILE' at the end of WHILE")?;
        self.skip_trailing_identifier();
        self.expect_newline("after ENDWHILE")?;
        Ok(Stmt::While { cond, body, pos })
    }

    /// `REPEAT ... UNTIL <cond>`
    fn parse_repeat(&mut self, pos: Position) -> ParseResult<Stmt> {
        self.expect_newline("after REPEAT")?;
        let body = self.parse_block(&[Token::Until])?;
        self.expect(&Token::Until, "'UNTIL' at the end of REPEAT")?;
        let cond = self.parse_expression()?;
        self.expect_newline("after the UNTIL condition")?;
        Ok(Stmt::Repeat { body, cond, pos })
    }

    /// `FOR <var> <- <start> TO <stop> [STEP <step>] ... ENDFOR`
    fn parse_for(&mut self, pos: Position) -> ParseResult<Stmt> {
        let (var, _) = self.expect_identifier("a loop variable after FOR")?;
        self.expect(&Token::Assign, "'<-' after the loop variable")?;
        let start = self.parse_expression()?;
        self.expect(&Token::To, "'TO' after the start value")?;
        let stop = self.parse_expression()?;
        let step = if self.match_token(&Token::Step) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_newline("after the FOR header")?;
        let body = self.parse_block(&[Token::EndFor])?;
        self.expect(&Token::EndFor, "'ENDFOR' at the end of FOR")?;
        self.skip_trailing_identifier();
        self.expect_newline("after ENDFOR")?;
        Ok(Stmt::For { var,
                       start,
                       stop,
                       step,
                       body,
                       pos })
    }

    /// `PROCEDURE <name> [(params)] ... ENDPROCEDURE`
    fn parse_procedure(&mut self, pos: Position) -> ParseResult<Stmt> {
        let (name, _) = self.expect_identifier("a name after PROCEDURE")?;
        let params = if self.match_token(&Token::LParen) {
            self.parse_params()?
        } else {
            Vec::new()
        };
        self.expect_newline("after the PROCEDURE header")?;
        let body = self.parse_block(&[Token::EndProcedure])?;
        self.expect(&Token::EndProcedure, "'ENDPROCEDURE' at the end of PROCEDURE")?;
        self.expect_newline("after ENDPROCEDURE")?;
        Ok(Stmt::Procedure(CallableDecl { name,
                                          params,
                                          return_type: None,
                                          body,
                                          pos }))
    }

    /// `FUNCTION <name> [(params)] RETURNS <type> ... ENDFUNCTION`
    fn parse_function(&mut self, pos: Position) -> ParseResult<Stmt> {
        let (name, _) = self.expect_identifier("a name after FUNCTION")?;
        let params = if self.match_token(&Token::LParen) {
            self.parse_params()?
        } else {
            Vec::new()
        };
        self.expect(&Token::Returns, "'RETURNS' after the FUNCTION header")?;
        let return_type = self.parse_type_name()?;
        self.expect_newline("after the return type")?;
        let body = self.parse_block(&[Token::EndFunction])?;
        self.expect(&Token::EndFunction, "'ENDFUNCTION' at the end of FUNCTION")?;
        self.expect_newline("after ENDFUNCTION")?;
        Ok(Stmt::Function(CallableDecl { name,
                                         params,
                                         return_type: Some(return_type),
                                         body,
                                         pos }))
    }

    /// Parameters up to and including the closing `)`. Each parameter may
    /// carry its own `BYVALUE`/`BYREF` prefix; `BYVALUE` is the default.
    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.match_token(&Token::RParen) {
            return Ok(params);
        }
        loop {
            let mode = if self.match_token(&Token::ByRef) {
                PassMode::ByReference
            } else {
                self.match_token(&Token::ByValue);
                PassMode::ByValue
            };
            let (name, param_pos) = self.expect_identifier("a parameter name")?;
            self.expect(&Token::Colon, "':' after the parameter name")?;
            let ty = self.parse_type_name()?;
            params.push(Param { name,
                                ty,
                                mode,
                                pos: param_pos });
            if self.match_token(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "',' or ')' after a parameter")?;
            break;
        }
        Ok(params)
    }

    /// `CALL <name> [(args)]`
    fn parse_call(&mut self, pos: Position) -> ParseResult<Stmt> {
        let (name, _) = self.expect_identifier("a PROCEDURE name after CALL")?;
        let args = if self.match_token(&Token::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        self.expect_newline("after CALL")?;
        Ok(Stmt::Call { name, args, pos })
    }

    /// `RETURN <expr>`
    fn parse_return(&mut self, pos: Position) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;
        self.expect_newline("after RETURN")?;
        Ok(Stmt::Return { expr, pos })
    }

    /// `OPENFILE <filename> FOR READ|WRITE|APPEND`
    fn parse_open_file(&mut self, pos: Position) -> ParseResult<Stmt> {
        let filename = self.parse_filename()?;
        self.expect(&Token::For, "'FOR' after the filename")?;
        let mode = match self.peek() {
            Some((Token::Read, _)) => {
                self.advance();
                FileMode::Read
            },
            Some((Token::Write, _)) => {
                self.advance();
                FileMode::Write
            },
            Some((Token::Append, _)) => {
                self.advance();
                FileMode::Append
            },
            _ => return Err(self.unexpected("a file mode: READ, WRITE or APPEND")),
        };
        self.expect_newline("after the file mode")?;
        Ok(Stmt::OpenFile { filename, mode, pos })
    }

    /// `READFILE <filename>, <target>`
    fn parse_read_file(&mut self, pos: Position) -> ParseResult<Stmt> {
        let filename = self.parse_filename()?;
        self.expect(&Token::Comma, "',' after the filename")?;
        let target = self.parse_variable_reference()?;
        self.expect_newline("after READFILE")?;
        Ok(Stmt::ReadFile { filename,
                            target,
                            pos })
    }

    /// `WRITEFILE <filename>, <value>`
    fn parse_write_file(&mut self, pos: Position) -> ParseResult<Stmt> {
        let filename = self.parse_filename()?;
        self.expect(&Token::Comma, "',' after the filename")?;
        let value = self.parse_expression()?;
        self.expect_newline("after WRITEFILE")?;
        Ok(Stmt::WriteFile { filename,
                             value,
                             pos })
    }

    /// `CLOSEFILE <filename>`
    fn parse_close_file(&mut self, pos: Position) -> ParseResult<Stmt> {
        let filename = self.parse_filename()?;
        self.expect_newline("after CLOSEFILE")?;
        Ok(Stmt::CloseFile { filename, pos })
    }
}
