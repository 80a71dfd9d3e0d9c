use crate::ast::PassMode;

/// A resolved static type.
///
/// Equality is structural for the atomic types and for array shapes
/// (element type plus declared bounds), and nominal for records. Callables
/// and open files are not expression types: callable signatures live in the
/// resolver's registry keyed by name, and files live in the file table
/// keyed by filename.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A 64-bit signed integer.
    Integer,
    /// An IEEE-754 double.
    Real,
    /// An immutable sequence of code points.
    String,
    /// `TRUE` or `FALSE`.
    Boolean,
    /// A fixed-shape array.
    Array(ArrayType),
    /// A user-declared record type, identified by name.
    Record(String),
}

/// The shape of an array type: its element type and declared bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    /// The element type; never itself an array.
    pub elem:   Box<Type>,
    /// Inclusive `(lo, hi)` bound pairs, one per dimension (1 or 2).
    pub bounds: Vec<(i64, i64)>,
}

impl Type {
    /// Returns `true` for `INTEGER` and `REAL`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }

    /// Returns `true` for the four atomic types.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self,
                 Self::Integer | Self::Real | Self::String | Self::Boolean)
    }

    /// Returns `true` if a value of type `other` may be stored in a slot of
    /// this type. Types must be equal, except for the single widening from
    /// `INTEGER` to `REAL`.
    #[must_use]
    pub fn accepts(&self, other: &Self) -> bool {
        self == other || (*self == Self::Real && *other == Self::Integer)
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Real => write!(f, "REAL"),
            Self::String => write!(f, "STRING"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Array(array) => {
                write!(f, "ARRAY[")?;
                for (i, (lo, hi)) in array.bounds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{lo}:{hi}")?;
                }
                write!(f, "] OF {}", array.elem)
            },
            Self::Record(name) => write!(f, "{name}"),
        }
    }
}

/// A declared record type: its name and ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    /// The declared type name.
    pub name:   String,
    /// The fields, in declared order.
    pub fields: Vec<(String, Type)>,
}

impl RecordDef {
    /// Looks up a field's declared type.
    #[must_use]
    pub fn field_type(&self, field: &str) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, ty)| ty)
    }
}

/// One parameter of a callable signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    /// The parameter name.
    pub name: String,
    /// The resolved parameter type.
    pub ty:   Type,
    /// How arguments bind to this parameter.
    pub mode: PassMode,
}

/// The statically known shape of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// The parameters, in declared order.
    pub params:      Vec<ParamSig>,
    /// The return type; present for functions, absent for procedures.
    pub return_type: Option<Type>,
}
