//! The built-in functions pre-registered in the global frame.
//!
//! Built-ins are declared to the resolver with fixed signatures and are
//! type-checked exactly like user functions. Their implementations live
//! here, except for `EOF`, which needs the interpreter's file table and is
//! handled by the evaluator.

use rand::Rng;

use crate::{
    ast::{PassMode, Position},
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::core::EvalResult,
        types::{ParamSig, Signature, Type},
        value::Value,
    },
    util::num::f64_to_i64_checked,
};

/// The built-in functions of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `EOF(filename)`: `TRUE` when an open `READ`-mode file has no more
    /// lines.
    Eof,
    /// `INT(x)`: truncates a `REAL` toward zero.
    Int,
    /// `MID(s, start, length)`: a substring by 1-based position.
    Mid,
    /// `LENGTH(s)`: the number of characters in a string.
    Length,
    /// `LEFT(s, n)`: the first `n` characters.
    Left,
    /// `RIGHT(s, n)`: the last `n` characters.
    Right,
    /// `ASC(c)`: the code point of a one-character string.
    Asc,
    /// `RANDOMBETWEEN(a, b)`: a random `INTEGER` in `[a, b]`, requiring
    /// `a < b`.
    RandomBetween,
    /// `RND()`: a random `REAL` in `[0, 1)`.
    Rnd,
}

/// Every built-in, in registration order.
pub const ALL: [Builtin; 9] = [Builtin::Eof,
                               Builtin::Int,
                               Builtin::Mid,
                               Builtin::Length,
                               Builtin::Left,
                               Builtin::Right,
                               Builtin::Asc,
                               Builtin::RandomBetween,
                               Builtin::Rnd];

impl Builtin {
    /// Finds the built-in with the given source-level name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        ALL.into_iter().find(|b| b.name() == name)
    }

    /// The built-in's source-level name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eof => "EOF",
            Self::Int => "INT",
            Self::Mid => "MID",
            Self::Length => "LENGTH",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Asc => "ASC",
            Self::RandomBetween => "RANDOMBETWEEN",
            Self::Rnd => "RND",
        }
    }

    /// The built-in's fixed signature. All parameters are `BYVALUE`.
    #[must_use]
    pub fn signature(self) -> Signature {
        let param = |name: &str, ty: Type| ParamSig { name: name.to_string(),
                                                      ty,
                                                      mode: PassMode::ByValue };
        match self {
            Self::Eof => Signature { params:      vec![param("Filename", Type::String)],
                                     return_type: Some(Type::Boolean), },
            Self::Int => Signature { params:      vec![param("x", Type::Real)],
                                     return_type: Some(Type::Integer), },
            Self::Mid => Signature { params:      vec![param("ThisString", Type::String),
                                                       param("Start", Type::Integer),
                                                       param("Length", Type::Integer)],
                                     return_type: Some(Type::String), },
            Self::Length => Signature { params:      vec![param("ThisString", Type::String)],
                                        return_type: Some(Type::Integer), },
            Self::Left => Signature { params:      vec![param("ThisString", Type::String),
                                                        param("x", Type::Integer)],
                                      return_type: Some(Type::String), },
            Self::Right => Signature { params:      vec![param("ThisString", Type::String),
                                                         param("x", Type::Integer)],
                                       return_type: Some(Type::String), },
            Self::Asc => Signature { params:      vec![param("ThisChar", Type::String)],
                                     return_type: Some(Type::Integer), },
            Self::RandomBetween => Signature { params:      vec![param("Start", Type::Integer),
                                                                 param("End", Type::Integer)],
                                               return_type: Some(Type::Integer), },
            Self::Rnd => Signature { params:      Vec::new(),
                                     return_type: Some(Type::Real), },
        }
    }
}

fn invalid(name: &'static str, details: String, pos: Position) -> RuntimeError {
    RuntimeError::new(RuntimeErrorKind::InvalidArgument { name, details }, pos)
}

/// `INT(x)`: truncates toward zero.
pub fn int(x: f64, pos: Position) -> EvalResult<Value> {
    let n = f64_to_i64_checked(x, RuntimeError::new(RuntimeErrorKind::Overflow, pos))?;
    Ok(Value::Integer(n))
}

/// `LENGTH(s)`: the number of code points in `s`.
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub fn length(s: &str) -> Value {
    Value::Integer(s.chars().count() as i64)
}

/// `MID(s, start, length)`: the substring of `s` starting at the 1-based
/// position `start` with `length` characters.
///
/// # Errors
/// Raises an invalid-argument error when the requested range falls outside
/// the string.
pub fn mid(s: &str, start: i64, len: i64, pos: Position) -> EvalResult<Value> {
    let total = s.chars().count() as i64;
    let end = start.checked_add(len).map(|e| e - 1);
    if start < 1 || len < 0 || end.is_none_or(|e| e > total) {
        return Err(invalid("MID",
                           format!("position {start} length {len} in a string of {total}"),
                           pos));
    }
    #[allow(clippy::cast_sign_loss)]
    let result: String = s.chars()
                          .skip(start as usize - 1)
                          .take(len as usize)
                          .collect();
    Ok(Value::Str(result))
}

/// `LEFT(s, n)`: the first `n` characters of `s`.
///
/// # Errors
/// Raises an invalid-argument error when `n` is negative or exceeds the
/// string's length.
pub fn left(s: &str, n: i64, pos: Position) -> EvalResult<Value> {
    let total = s.chars().count() as i64;
    if n < 0 || n > total {
        return Err(invalid("LEFT", format!("{n} characters of a string of {total}"), pos));
    }
    #[allow(clippy::cast_sign_loss)]
    let result: String = s.chars().take(n as usize).collect();
    Ok(Value::Str(result))
}

/// `RIGHT(s, n)`: the last `n` characters of `s`.
///
/// # Errors
/// Raises an invalid-argument error when `n` is negative or exceeds the
/// string's length.
pub fn right(s: &str, n: i64, pos: Position) -> EvalResult<Value> {
    let total = s.chars().count() as i64;
    if n < 0 || n > total {
        return Err(invalid("RIGHT", format!("{n} characters of a string of {total}"), pos));
    }
    #[allow(clippy::cast_sign_loss)]
    let result: String = s.chars().skip((total - n) as usize).collect();
    Ok(Value::Str(result))
}

/// `ASC(c)`: the code point of the single character in `c`.
///
/// # Errors
/// Raises an invalid-argument error unless `c` is exactly one character.
pub fn asc(s: &str, pos: Position) -> EvalResult<Value> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Integer(i64::from(u32::from(c)))),
        _ => Err(invalid("ASC", format!("expected a single character, got \"{s}\""), pos)),
    }
}

/// `RANDOMBETWEEN(a, b)`: a uniformly random `INTEGER` in `[a, b]`.
///
/// # Errors
/// Raises an invalid-argument error unless `a < b`.
pub fn random_between(a: i64, b: i64, pos: Position) -> EvalResult<Value> {
    if a >= b {
        return Err(invalid("RANDOMBETWEEN", format!("{a} is not less than {b}"), pos));
    }
    Ok(Value::Integer(rand::rng().random_range(a..=b)))
}

/// `RND()`: a uniformly random `REAL` in `[0, 1)`.
#[must_use]
pub fn rnd() -> Value {
    Value::Real(rand::rng().random::<f64>())
}
