use crate::{
    ast::Position,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl<'a> Parser<'a> {
    /// Creates a parser over a scanned token sequence.
    #[must_use]
    pub fn new(tokens: &'a [(Token, Position)]) -> Self {
        Self { tokens:   tokens.iter().peekable(),
               last_pos: Position { line: 1, column: 1 }, }
    }

    /// Returns the token at the cursor without advancing.
    pub(in crate::interpreter::parser) fn peek(&mut self) -> Option<&'a (Token, Position)> {
        self.tokens.peek().copied()
    }

    /// Returns the token at the cursor and advances past it.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> Option<&'a (Token, Position)> {
        let item = self.tokens.next();
        if let Some((_, pos)) = item {
            self.last_pos = *pos;
        }
        item
    }

    /// Consumes the next token if it equals `token`.
    pub(in crate::interpreter::parser) fn match_token(&mut self, token: &Token) -> bool {
        if matches!(self.peek(), Some((t, _)) if t == token) {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes the next token if it equals `token`, or fails with a
    /// description of what was expected.
    pub(in crate::interpreter::parser) fn expect(&mut self,
                                                 token: &Token,
                                                 expected: &str)
                                                 -> ParseResult<Position> {
        match self.peek() {
            Some((t, pos)) if t == token => {
                self.advance();
                Ok(*pos)
            },
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Consumes an identifier token and returns its name and position.
    pub(in crate::interpreter::parser) fn expect_identifier(&mut self,
                                                            expected: &str)
                                                            -> ParseResult<(String, Position)> {
        match self.peek() {
            Some((Token::Identifier(name), pos)) => {
                self.advance();
                Ok((name.clone(), *pos))
            },
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Consumes the newline that terminates a statement. The end of the
    /// token stream terminates a statement too.
    pub(in crate::interpreter::parser) fn expect_newline(&mut self,
                                                         context: &str)
                                                         -> ParseResult<()> {
        match self.peek() {
            Some((Token::Newline, _)) => {
                self.advance();
                Ok(())
            },
            None => Ok(()),
            _ => Err(self.unexpected(&format!("end of line {context}"))),
        }
    }

    /// Skips any newline tokens at the cursor.
    pub(in crate::interpreter::parser) fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some((Token::Newline, _))) {
            self.advance();
        }
    }

    /// Consumes a trailing identifier, as tolerated after `ENDFOR`,
    /// `ENDWHILE`, and `ENDCASE`. The name is not validated.
    pub(in crate::interpreter::parser) fn skip_trailing_identifier(&mut self) {
        if matches!(self.peek(), Some((Token::Identifier(_), _))) {
            self.advance();
        }
    }

    /// Builds the error for an unexpected token (or for running out of
    /// tokens) at the cursor.
    pub(in crate::interpreter::parser) fn unexpected(&mut self, expected: &str) -> ParseError {
        match self.peek() {
            Some((token, pos)) => ParseError::UnexpectedToken { expected: expected.to_string(),
                                                                found:    token.to_string(),
                                                                pos:      *pos, },
            None => ParseError::UnexpectedEndOfInput { pos: self.last_pos },
        }
    }
}
