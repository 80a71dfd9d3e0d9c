use std::collections::HashMap;

use crate::{
    ast::{Literal, Position},
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::core::EvalResult,
        types::{ArrayType, RecordDef, Type},
    },
    util::num::i64_to_f64_checked,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models every value a slot can hold. The variants mirror the
/// static type tags assigned by the resolver, plus [`Value::Null`] for a
/// slot that has been declared but never assigned.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An `INTEGER` value (64-bit signed).
    Integer(i64),
    /// A `REAL` value (double precision floating-point).
    Real(f64),
    /// A `STRING` value.
    Str(String),
    /// A `BOOLEAN` value.
    Boolean(bool),
    /// An array with fixed bounds and flat element storage.
    Array(ArrayValue),
    /// A record with named fields in declared order.
    Record(RecordValue),
    /// The state of a declared slot before its first assignment.
    Null,
}

/// The storage for an array value.
///
/// Elements are kept in one flat, row-major vector of length
/// `prod(hi - lo + 1)`; an index tuple maps onto an offset from the
/// declared lower bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    /// Inclusive `(lo, hi)` bound pairs, one per dimension.
    pub bounds: Vec<(i64, i64)>,
    /// Flat element storage, row-major.
    pub elems:  Vec<Value>,
}

impl ArrayValue {
    /// Allocates an array of the given shape with every element set to the
    /// element type's empty value.
    #[must_use]
    pub fn new(ty: &ArrayType, records: &HashMap<String, RecordDef>) -> Self {
        let count = ty.bounds
                      .iter()
                      .map(|(lo, hi)| (hi - lo + 1).max(0) as usize)
                      .product();
        let elem = default_value(&ty.elem, records);
        Self { bounds: ty.bounds.clone(),
               elems:  vec![elem; count], }
    }

    /// Maps an index tuple onto a flat offset, or `None` when any index
    /// falls outside the declared bounds.
    #[must_use]
    pub fn offset(&self, indexes: &[i64]) -> Option<usize> {
        if indexes.len() != self.bounds.len() {
            return None;
        }
        let mut offset = 0usize;
        for (index, (lo, hi)) in indexes.iter().zip(&self.bounds) {
            if index < lo || index > hi {
                return None;
            }
            let width = (hi - lo + 1) as usize;
            offset = offset * width + (index - lo) as usize;
        }
        Some(offset)
    }

    /// Borrows the element at an index tuple.
    #[must_use]
    pub fn element(&self, indexes: &[i64]) -> Option<&Value> {
        self.offset(indexes).map(|o| &self.elems[o])
    }

    /// Mutably borrows the element at an index tuple.
    #[must_use]
    pub fn element_mut(&mut self, indexes: &[i64]) -> Option<&mut Value> {
        self.offset(indexes).map(move |o| &mut self.elems[o])
    }
}

/// The storage for a record value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    /// The record type's name.
    pub type_name: String,
    /// `(field, value)` pairs in declared order.
    pub fields:    Vec<(String, Value)>,
}

impl RecordValue {
    /// Allocates a record of the given definition with every field set to
    /// its type's empty value.
    #[must_use]
    pub fn new(def: &RecordDef, records: &HashMap<String, RecordDef>) -> Self {
        let fields = def.fields
                        .iter()
                        .map(|(name, ty)| (name.clone(), default_value(ty, records)))
                        .collect();
        Self { type_name: def.name.clone(),
               fields }
    }

    /// Borrows a field's value.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Mutably borrows a field's value.
    #[must_use]
    pub fn field_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }
}

/// Builds the value a freshly declared slot of the given type holds.
///
/// Scalars start as [`Value::Null`]; arrays and records are allocated at
/// their declared shape with null leaves, so that element and field
/// assignment works immediately after declaration.
#[must_use]
pub fn default_value(ty: &Type, records: &HashMap<String, RecordDef>) -> Value {
    match ty {
        Type::Integer | Type::Real | Type::String | Type::Boolean => Value::Null,
        Type::Array(array) => Value::Array(ArrayValue::new(array, records)),
        Type::Record(name) => match records.get(name) {
            Some(def) => Value::Record(RecordValue::new(def, records)),
            None => Value::Null,
        },
    }
}

impl Value {
    /// Converts the value to an `i64`, or returns an error if it is not an
    /// `INTEGER`.
    pub fn as_integer(&self, pos: Position) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            _ => Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected:
                                                                              "an INTEGER value" },
                                       pos)),
        }
    }

    /// Converts the value to an `f64`, widening an `INTEGER` if necessary.
    ///
    /// # Errors
    /// Fails if the value is not numeric, or if an integer is too large to
    /// be represented as `f64` exactly.
    pub fn as_real(&self, pos: Position) -> EvalResult<f64> {
        match self {
            Self::Real(r) => Ok(*r),
            Self::Integer(n) => {
                i64_to_f64_checked(*n, RuntimeError::new(RuntimeErrorKind::Overflow, pos))
            },
            _ => Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected:
                                                                              "a numeric value" },
                                       pos)),
        }
    }

    /// Converts the value to a `bool`, or returns an error if it is not a
    /// `BOOLEAN`.
    pub fn as_boolean(&self, pos: Position) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            _ => Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected:
                                                                              "a BOOLEAN value" },
                                       pos)),
        }
    }

    /// Borrows the value as a string slice, or returns an error if it is
    /// not a `STRING`.
    pub fn as_str(&self, pos: Position) -> EvalResult<&str> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected:
                                                                              "a STRING value" },
                                       pos)),
        }
    }

    /// Returns `true` if the value is [`Null`](Self::Null).
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Integer(n) => Self::Integer(*n),
            Literal::Real(r) => Self::Real(*r),
            Literal::Str(s) => Self::Str(s.clone()),
            Literal::Boolean(b) => Self::Boolean(*b),
        }
    }
}

impl std::fmt::Display for Value {
    /// Renders the value the way `OUTPUT` and `WRITEFILE` display it:
    /// integers in decimal, reals with at least one fractional digit,
    /// booleans as `TRUE`/`FALSE`, and strings verbatim without quotes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => {
                if r.is_finite() && r.fract() == 0.0 {
                    write!(f, "{r:.1}")
                } else {
                    write!(f, "{r}")
                }
            },
            Self::Str(s) => write!(f, "{s}"),
            Self::Boolean(true) => write!(f, "TRUE"),
            Self::Boolean(false) => write!(f, "FALSE"),
            Self::Array(array) => {
                write!(f, "[")?;
                for (i, elem) in array.elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "]")
            },
            Self::Record(record) => {
                write!(f, "{{")?;
                for (i, (name, value)) in record.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            },
            Self::Null => write!(f, "NULL"),
        }
    }
}
