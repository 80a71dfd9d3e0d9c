use logos::Logos;

use crate::{ast::Position, error::ScanError};

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the scanner.
/// This enum defines all recognized tokens in the language: the keyword
/// table, identifiers, the four literal forms, operators and punctuation,
/// and the newline terminator that ends a statement.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Real literal tokens, such as `3.14`. Digits are required on both
    /// sides of the point.
    #[regex(r"[0-9]+\.[0-9]+", parse_real)]
    Real(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens, such as `"hello"`. No escape sequences.
    #[regex(r#""[^"\n]*""#, parse_string)]
    Str(String),
    /// Boolean literal tokens: `TRUE` or `FALSE`.
    #[token("TRUE", |_| true)]
    #[token("FALSE", |_| false)]
    Boolean(bool),

    /// A real literal missing digits on one side of the point, such as `3.`
    /// or `.5`. Scanning reports these as errors.
    #[regex(r"[0-9]+\.")]
    #[regex(r"\.[0-9]+")]
    MalformedReal,
    /// A string literal whose line ends before the closing quote. Scanning
    /// reports these as errors.
    #[regex(r#""[^"\n]*"#)]
    UnterminatedString,

    /// `DECLARE`
    #[token("DECLARE")]
    Declare,
    /// `TYPE`
    #[token("TYPE")]
    Type,
    /// `ENDTYPE`
    #[token("ENDTYPE")]
    EndType,
    /// `ARRAY`
    #[token("ARRAY")]
    Array,
    /// `OF`
    #[token("OF")]
    Of,
    /// `IF`
    #[token("IF")]
    If,
    /// `THEN`
    #[token("THEN")]
    Then,
    /// `ELSE`
    #[token("ELSE")]
    Else,
    /// `ENDIF`
    #[token("ENDIF")]
    EndIf,
    /// `CASE`
    #[token("CASE")]
    Case,
    /// `OTHERWISE`
    #[token("OTHERWISE")]
    Otherwise,
    /// `ENDCASE`
    #[token("ENDCASE")]
    EndCase,
    /// `FOR`
    #[token("FOR")]
    For,
    /// `TO`
    #[token("TO")]
    To,
    /// `STEP`
    #[token("STEP")]
    Step,
    /// `ENDFOR`
    #[token("ENDFOR")]
    EndFor,
    /// `WHILE`
    #[token("WHILE")]
    While,
    /// `DO`
    #[token("DO")]
    Do,
    /// `ENDWHILE`
    #[token("ENDWHILE")]
    EndWhile,
    /// `REPEAT`
    #[token("REPEAT")]
    Repeat,
    /// `UNTIL`
    #[token("UNTIL")]
    Until,
    /// `PROCEDURE`
    #[token("PROCEDURE")]
    Procedure,
    /// `ENDPROCEDURE`
    #[token("ENDPROCEDURE")]
    EndProcedure,
    /// `FUNCTION`
    #[token("FUNCTION")]
    Function,
    /// `RETURNS`
    #[token("RETURNS")]
    Returns,
    /// `ENDFUNCTION`
    #[token("ENDFUNCTION")]
    EndFunction,
    /// `CALL`
    #[token("CALL")]
    Call,
    /// `RETURN`
    #[token("RETURN")]
    Return,
    /// `BYVALUE`
    #[token("BYVALUE")]
    ByValue,
    /// `BYREF`
    #[token("BYREF")]
    ByRef,
    /// `INPUT`
    #[token("INPUT")]
    Input,
    /// `OUTPUT`
    #[token("OUTPUT")]
    Output,
    /// `OPENFILE`
    #[token("OPENFILE")]
    OpenFile,
    /// `READFILE`
    #[token("READFILE")]
    ReadFile,
    /// `WRITEFILE`
    #[token("WRITEFILE")]
    WriteFile,
    /// `CLOSEFILE`
    #[token("CLOSEFILE")]
    CloseFile,
    /// `READ`
    #[token("READ")]
    Read,
    /// `WRITE`
    #[token("WRITE")]
    Write,
    /// `APPEND`
    #[token("APPEND")]
    Append,
    /// `AND`
    #[token("AND")]
    And,
    /// `OR`
    #[token("OR")]
    Or,
    /// `NOT`
    #[token("NOT")]
    Not,
    /// `INTEGER`
    #[token("INTEGER")]
    IntegerType,
    /// `REAL`
    #[token("REAL")]
    RealType,
    /// `STRING`
    #[token("STRING")]
    StringType,
    /// `BOOLEAN`
    #[token("BOOLEAN")]
    BooleanType,

    /// Identifier tokens; variable, type, or callable names such as `Total`.
    /// Identifiers are case-sensitive.
    #[regex(r"[A-Za-z][A-Za-z0-9]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `<-`
    #[token("<-")]
    Assign,
    /// `=`
    #[token("=")]
    Equal,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<>`
    #[token("<>")]
    NotEqual,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,

    /// Statement terminator. Runs of blank lines collapse to a single
    /// newline token during scanning.
    #[token("\n")]
    Newline,
    /// `// Comments.` The terminating newline stays in the stream.
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// Spaces, tabs, and carriage returns between tokens.
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Ignored,
}

/// Parses a real literal from the current token slice.
fn parse_real(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice. Returns `None`
/// when the literal does not fit an `i64`, which scanning reports as an
/// error.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Strips the enclosing quotes from a string literal.
fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(r) => write!(f, "'{r}'"),
            Self::Integer(n) => write!(f, "'{n}'"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Boolean(true) => write!(f, "'TRUE'"),
            Self::Boolean(false) => write!(f, "'FALSE'"),
            Self::MalformedReal | Self::UnterminatedString => write!(f, "an invalid literal"),
            Self::Declare => write!(f, "'DECLARE'"),
            Self::Type => write!(f, "'TYPE'"),
            Self::EndType => write!(f, "'ENDTYPE'"),
            Self::Array => write!(f, "'ARRAY'"),
            Self::Of => write!(f, "'OF'"),
            Self::If => write!(f, "'IF'"),
            Self::Then => write!(f, "'THEN'"),
            Self::Else => write!(f, "'ELSE'"),
            Self::EndIf => write!(f, "'ENDIF'"),
            Self::Case => write!(f, "'CASE'"),
            Self::Otherwise => write!(f, "'OTHERWISE'"),
            Self::EndCase => write!(f, "'ENDCASE'"),
            Self::For => write!(f, "'FOR'"),
            Self::To => write!(f, "'TO'"),
            Self::Step => write!(f, "'STEP'"),
            Self::EndFor => write!(f, "'ENDFOR'"),
            Self::While => write!(f, "'WHILE'"),
            Self::Do => write!(f, "'DO'"),
            Self::EndWhile => write!(f, "'ENDWHILE'"),
            Self::Repeat => write!(f, "'REPEAT'"),
            Self::Until => write!(f, "'UNTIL'"),
            Self::Procedure => write!(f, "'PROCEDURE'"),
            Self::EndProcedure => write!(f, "'ENDPROCEDURE'"),
            Self::Function => write!(f, "'FUNCTION'"),
            Self::Returns => write!(f, "'RETURNS'"),
            Self::EndFunction => write!(f, "'ENDFUNCTION'"),
            Self::Call => write!(f, "'CALL'"),
            Self::Return => write!(f, "'RETURN'"),
            Self::ByValue => write!(f, "'BYVALUE'"),
            Self::ByRef => write!(f, "'BYREF'"),
            Self::Input => write!(f, "'INPUT'"),
            Self::Output => write!(f, "'OUTPUT'"),
            Self::OpenFile => write!(f, "'OPENFILE'"),
            Self::ReadFile => write!(f, "'READFILE'"),
            Self::WriteFile => write!(f, "'WRITEFILE'"),
            Self::CloseFile => write!(f, "'CLOSEFILE'"),
            Self::Read => write!(f, "'READ'"),
            Self::Write => write!(f, "'WRITE'"),
            Self::Append => write!(f, "'APPEND'"),
            Self::And => write!(f, "'AND'"),
            Self::Or => write!(f, "'OR'"),
            Self::Not => write!(f, "'NOT'"),
            Self::IntegerType => write!(f, "'INTEGER'"),
            Self::RealType => write!(f, "'REAL'"),
            Self::StringType => write!(f, "'STRING'"),
            Self::BooleanType => write!(f, "'BOOLEAN'"),
            Self::Identifier(name) => write!(f, "'{name}'"),
            Self::Plus => write!(f, "'+'"),
            Self::Minus => write!(f, "'-'"),
            Self::Star => write!(f, "'*'"),
            Self::Slash => write!(f, "'/'"),
            Self::Assign => write!(f, "'<-'"),
            Self::Equal => write!(f, "'='"),
            Self::Less => write!(f, "'<'"),
            Self::Greater => write!(f, "'>'"),
            Self::LessEqual => write!(f, "'<='"),
            Self::GreaterEqual => write!(f, "'>='"),
            Self::NotEqual => write!(f, "'<>'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::LBracket => write!(f, "'['"),
            Self::RBracket => write!(f, "']'"),
            Self::Comma => write!(f, "','"),
            Self::Colon => write!(f, "':'"),
            Self::Dot => write!(f, "'.'"),
            Self::Newline => write!(f, "end of line"),
            Self::Comment | Self::Ignored => write!(f, "whitespace"),
        }
    }
}

/// Scans source text into a sequence of positioned tokens.
///
/// Each token is paired with the 1-based line and column of its first
/// character. Spaces, tabs, carriage returns, and `//` comments are
/// discarded; newlines become tokens because they terminate statements,
/// with runs of blank lines collapsed to a single newline token.
///
/// # Errors
/// Returns a [`ScanError`] for an unrecognised character, an unterminated
/// string, a malformed real literal such as `3.` or `.5`, or an integer
/// literal that does not fit 64 bits.
///
/// # Example
/// ```
/// use pseudo9608::interpreter::lexer::{Token, scan};
///
/// let tokens = scan("x <- 1").unwrap();
/// assert_eq!(tokens[0].0, Token::Identifier("x".to_string()));
/// assert_eq!(tokens[1].0, Token::Assign);
/// assert_eq!(tokens[2].0, Token::Integer(1));
/// assert_eq!(tokens[2].1.column, 6);
/// ```
pub fn scan(src: &str) -> Result<Vec<(Token, Position)>, ScanError> {
    let mut tokens: Vec<(Token, Position)> = Vec::new();
    let mut lexer = Token::lexer(src);
    let mut line = 1;
    let mut line_start = 0;

    while let Some(item) = lexer.next() {
        let span = lexer.span();
        let pos = Position { line,
                             column: span.start - line_start + 1 };
        match item {
            Ok(Token::Newline) => {
                if !matches!(tokens.last(), Some((Token::Newline, _))) {
                    tokens.push((Token::Newline, pos));
                }
                line += 1;
                line_start = span.end;
            },
            Ok(Token::MalformedReal) => {
                return Err(ScanError::MalformedReal { lexeme: lexer.slice().to_string(),
                                                      pos });
            },
            Ok(Token::UnterminatedString) => return Err(ScanError::UnterminatedString { pos }),
            Ok(token) => tokens.push((token, pos)),
            Err(()) => {
                let lexeme = lexer.slice().to_string();
                if lexeme.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ScanError::IntegerOutOfRange { lexeme, pos });
                }
                return Err(ScanError::BadCharacter { lexeme, pos });
            },
        }
    }

    Ok(tokens)
}
