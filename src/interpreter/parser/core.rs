use std::{iter::Peekable, slice::Iter};

use crate::{
    ast::{BinaryOperator, Expr, Literal, Position, UnaryOperator},
    error::ParseError,
    interpreter::lexer::Token,
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// A recursive descent parser over a scanned token sequence.
///
/// The parser owns a cursor into the token slice and remembers the position
/// of the last consumed token, so that running out of tokens inside a
/// construct still reports a useful location.
///
/// Expressions are parsed with this precedence (lowest to highest):
/// 1. `OR`
/// 2. `AND`
/// 3. `NOT`
/// 4. `= <> < > <= >=` (non-associative)
/// 5. `+ -`
/// 6. `* /`
/// 7. unary `-`
/// 8. postfix `[..]`, `.field`, `(..)`
/// 9. literals, names, parenthesised expressions
pub struct Parser<'a> {
    pub(in crate::interpreter::parser) tokens:   Peekable<Iter<'a, (Token, Position)>>,
    pub(in crate::interpreter::parser) last_pos: Position,
}

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It begins at the
    /// lowest-precedence level, logical `OR`, and recursively descends
    /// through the precedence hierarchy.
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_and()?;
        while let Some((Token::Or, pos)) = self.peek() {
            let pos = *pos;
            self.advance();
            let right = self.parse_and()?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op: BinaryOperator::Or,
                                  right: Box::new(right),
                                  pos };
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_not()?;
        while let Some((Token::And, pos)) = self.peek() {
            let pos = *pos;
            self.advance();
            let right = self.parse_not()?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op: BinaryOperator::And,
                                  right: Box::new(right),
                                  pos };
        }
        Ok(expr)
    }

    /// `NOT` binds looser than the comparisons, so `NOT a = b` negates the
    /// whole comparison.
    fn parse_not(&mut self) -> ParseResult<Expr> {
        if let Some((Token::Not, pos)) = self.peek() {
            let pos = *pos;
            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expr::Unary { op: UnaryOperator::Not,
                                    operand: Box::new(operand),
                                    pos });
        }
        self.parse_comparison()
    }

    /// Parses a comparison. The relational operators are non-associative:
    /// a second relational operator at the same level is an error.
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_additive()?;
        let (op, pos) = match self.peek() {
            Some((token, pos)) => match comparison_operator(token) {
                Some(op) => (op, *pos),
                None => return Ok(expr),
            },
            None => return Ok(expr),
        };
        self.advance();
        let right = self.parse_additive()?;
        if let Some((token, pos)) = self.peek()
           && comparison_operator(token).is_some()
        {
            return Err(ParseError::ChainedComparison { pos: *pos });
        }
        Ok(Expr::Binary { left: Box::new(expr),
                          op,
                          right: Box::new(right),
                          pos })
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let (op, pos) = match self.peek() {
                Some((Token::Plus, pos)) => (BinaryOperator::Add, *pos),
                Some((Token::Minus, pos)) => (BinaryOperator::Sub, *pos),
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right),
                                  pos };
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_unary()?;
        loop {
            let (op, pos) = match self.peek() {
                Some((Token::Star, pos)) => (BinaryOperator::Mul, *pos),
                Some((Token::Slash, pos)) => (BinaryOperator::Div, *pos),
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right),
                                  pos };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if let Some((Token::Minus, pos)) = self.peek() {
            let pos = *pos;
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary { op: UnaryOperator::Negate,
                                    operand: Box::new(operand),
                                    pos });
        }
        self.parse_value()
    }

    /// Parses a primary expression with its postfix forms. A call is only
    /// recognised directly on a bare name, since callables are not values.
    pub(in crate::interpreter::parser) fn parse_value(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        if let Expr::Name { name, pos } = &expr
           && matches!(self.peek(), Some((Token::LParen, _)))
        {
            let name = name.clone();
            let pos = *pos;
            self.advance();
            let args = self.parse_arguments()?;
            expr = Expr::Call { name, args, pos };
        }
        self.parse_postfix(expr)
    }

    /// Applies `[..]` and `.field` postfix forms to an expression.
    pub(in crate::interpreter::parser) fn parse_postfix(&mut self,
                                                        mut expr: Expr)
                                                        -> ParseResult<Expr> {
        loop {
            match self.peek() {
                Some((Token::LBracket, pos)) => {
                    let pos = *pos;
                    self.advance();
                    let indexes = self.parse_index_list()?;
                    expr = Expr::Index { array: Box::new(expr),
                                         indexes,
                                         pos };
                },
                Some((Token::Dot, _)) => {
                    self.advance();
                    let (field, pos) = self.expect_identifier("a field name after '.'")?;
                    expr = Expr::Field { object: Box::new(expr),
                                         field,
                                         pos };
                },
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some((Token::Integer(n), pos)) => {
                let (n, pos) = (*n, *pos);
                self.advance();
                Ok(Expr::Literal { value: Literal::Integer(n),
                                   pos })
            },
            Some((Token::Real(r), pos)) => {
                let (r, pos) = (*r, *pos);
                self.advance();
                Ok(Expr::Literal { value: Literal::Real(r),
                                   pos })
            },
            Some((Token::Str(s), pos)) => {
                let (s, pos) = (s.clone(), *pos);
                self.advance();
                Ok(Expr::Literal { value: Literal::Str(s),
                                   pos })
            },
            Some((Token::Boolean(b), pos)) => {
                let (b, pos) = (*b, *pos);
                self.advance();
                Ok(Expr::Literal { value: Literal::Boolean(b),
                                   pos })
            },
            Some((Token::LParen, _)) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')' to close the grouping")?;
                Ok(expr)
            },
            Some((Token::Identifier(name), pos)) => {
                let (name, pos) = (name.clone(), *pos);
                self.advance();
                Ok(Expr::Name { name, pos })
            },
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Parses `(`-opened call arguments up to and including the closing
    /// `)`. The opening parenthesis must already be consumed.
    pub(in crate::interpreter::parser) fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.match_token(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.match_token(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "',' or ')' after an argument")?;
            break;
        }
        Ok(args)
    }

    /// Parses `[`-opened index expressions up to and including the closing
    /// `]`. The opening bracket must already be consumed.
    fn parse_index_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut indexes = Vec::new();
        loop {
            indexes.push(self.parse_expression()?);
            if self.match_token(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RBracket, "',' or ']' after an index")?;
            break;
        }
        Ok(indexes)
    }

    /// Parses an assignment or input target: a name with optional index
    /// and field postfix forms, but no calls.
    pub(in crate::interpreter::parser) fn parse_variable_reference(&mut self) -> ParseResult<Expr> {
        let (name, pos) = self.expect_identifier("a variable name")?;
        self.parse_postfix(Expr::Name { name, pos })
    }

    /// Parses the filename of a file statement: either a string literal,
    /// or a dotted identifier sequence such as `FileA.txt`, which becomes
    /// a single string literal.
    pub(in crate::interpreter::parser) fn parse_filename(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some((Token::Str(s), pos)) => {
                let (s, pos) = (s.clone(), *pos);
                self.advance();
                Ok(Expr::Literal { value: Literal::Str(s),
                                   pos })
            },
            Some((Token::Identifier(first), pos)) => {
                let (mut name, pos) = (first.clone(), *pos);
                self.advance();
                while self.match_token(&Token::Dot) {
                    let (part, _) = self.expect_identifier("a filename part after '.'")?;
                    name.push('.');
                    name.push_str(&part);
                }
                Ok(Expr::Literal { value: Literal::Str(name),
                                   pos })
            },
            _ => Err(self.unexpected("a filename")),
        }
    }
}

/// Maps a relational operator token onto its operator, if it is one.
const fn comparison_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Equal => Some(BinaryOperator::Equal),
        Token::NotEqual => Some(BinaryOperator::NotEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        _ => None,
    }
}
