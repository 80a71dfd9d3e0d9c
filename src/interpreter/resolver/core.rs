use std::collections::HashMap;

use crate::{
    ast::{self, Literal, Position},
    error::ResolveError,
    interpreter::{
        builtin,
        typed::{CallableDef, Program, Scope},
        types::{ArrayType, RecordDef, Signature, Type},
    },
};

/// Result type used by the resolver.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// The static pre-execution pass.
///
/// The resolver walks the parsed statements once, in source order,
/// simulating the frame structure the interpreter will use at runtime: one
/// global name table, plus one local table while inside a callable body. It
/// rebuilds the tree into [`crate::interpreter::typed`] form, assigning a
/// type to every expression and rejecting programs that would misuse one.
pub struct Resolver {
    /// Global variable types by name.
    pub(in crate::interpreter::resolver) globals:        HashMap<String, Type>,
    /// Local variable types while resolving a callable body.
    pub(in crate::interpreter::resolver) locals:         Option<HashMap<String, Type>>,
    /// Declared record types by name.
    pub(in crate::interpreter::resolver) records:        HashMap<String, RecordDef>,
    /// Callable signatures by name, built-ins included.
    pub(in crate::interpreter::resolver) signatures:     HashMap<String, Signature>,
    /// Resolved user callables by name.
    pub(in crate::interpreter::resolver) callables:      HashMap<String, CallableDef>,
    /// The enclosing function's return type; `None` in procedures and at
    /// the top level.
    pub(in crate::interpreter::resolver) current_return: Option<Type>,
}

/// Resolves a parsed program into an executable [`Program`].
///
/// # Errors
/// Returns the first [`ResolveError`] found, in source order.
///
/// # Example
/// ```
/// use pseudo9608::interpreter::{
///     lexer::scan, parser::statement::parse_program, resolver::core::resolve_program,
/// };
///
/// let tokens = scan("DECLARE x : INTEGER\nx <- 7\n").unwrap();
/// let stmts = parse_program(&tokens).unwrap();
/// let program = resolve_program(&stmts).unwrap();
/// assert_eq!(program.stmts.len(), 2);
///
/// // Type errors are caught before anything runs.
/// let tokens = scan("DECLARE x : INTEGER\nx <- \"seven\"\n").unwrap();
/// let stmts = parse_program(&tokens).unwrap();
/// assert!(resolve_program(&stmts).is_err());
/// ```
pub fn resolve_program(stmts: &[ast::Stmt]) -> Result<Program, ResolveError> {
    let mut resolver = Resolver::new();
    let mut resolved = Vec::new();
    for stmt in stmts {
        if let Some(stmt) = resolver.resolve_stmt(stmt)? {
            resolved.push(stmt);
        }
    }
    Ok(Program { stmts:     resolved,
                 callables: resolver.callables,
                 records:   resolver.records, })
}

impl Resolver {
    /// Creates a resolver with the built-in functions pre-registered in
    /// the global frame.
    #[must_use]
    pub fn new() -> Self {
        let signatures = builtin::ALL.into_iter()
                                     .map(|b| (b.name().to_string(), b.signature()))
                                     .collect();
        Self { globals: HashMap::new(),
               locals: None,
               records: HashMap::new(),
               signatures,
               callables: HashMap::new(),
               current_return: None }
    }

    /// Maps a written type name onto a resolved type, validating record
    /// references and array shapes.
    pub(in crate::interpreter::resolver) fn type_from_name(&self,
                                                           ty: &ast::TypeName,
                                                           pos: Position)
                                                           -> ResolveResult<Type> {
        match ty {
            ast::TypeName::Integer => Ok(Type::Integer),
            ast::TypeName::Real => Ok(Type::Real),
            ast::TypeName::String => Ok(Type::String),
            ast::TypeName::Boolean => Ok(Type::Boolean),
            ast::TypeName::Named(name) => {
                if self.records.contains_key(name) {
                    Ok(Type::Record(name.clone()))
                } else {
                    Err(ResolveError::UnknownType { name: name.clone(),
                                                    pos })
                }
            },
            ast::TypeName::Array { bounds, elem } => {
                if bounds.is_empty() || bounds.len() > 2 {
                    return Err(ResolveError::InvalidArrayType {
                        details: format!("{} dimensions are not supported", bounds.len()),
                        pos,
                    });
                }
                for (lo, hi) in bounds {
                    if lo > hi {
                        return Err(ResolveError::InvalidArrayType {
                            details: format!("lower bound {lo} is above upper bound {hi}"),
                            pos,
                        });
                    }
                }
                let elem = self.type_from_name(elem, pos)?;
                if matches!(elem, Type::Array(_)) {
                    return Err(ResolveError::InvalidArrayType {
                        details: "the element type may not itself be an ARRAY".to_string(),
                        pos,
                    });
                }
                Ok(Type::Array(ArrayType { elem:   Box::new(elem),
                                           bounds: bounds.clone(), }))
            },
        }
    }

    /// Declares a variable in the current frame, rejecting clashes with
    /// existing variables and callables.
    pub(in crate::interpreter::resolver) fn declare_variable(&mut self,
                                                             name: &str,
                                                             ty: Type,
                                                             pos: Position)
                                                             -> ResolveResult<Scope> {
        if self.signatures.contains_key(name) {
            return Err(ResolveError::Redeclared { name: name.to_string(),
                                                  pos });
        }
        let (frame, scope) = match &mut self.locals {
            Some(locals) => (locals, Scope::Local),
            None => (&mut self.globals, Scope::Global),
        };
        if frame.contains_key(name) {
            return Err(ResolveError::Redeclared { name: name.to_string(),
                                                  pos });
        }
        frame.insert(name.to_string(), ty);
        Ok(scope)
    }

    /// Looks a variable up, innermost frame first.
    pub(in crate::interpreter::resolver) fn lookup_variable(&self,
                                                            name: &str)
                                                            -> Option<(Scope, &Type)> {
        if let Some(locals) = &self.locals
           && let Some(ty) = locals.get(name)
        {
            return Some((Scope::Local, ty));
        }
        self.globals.get(name).map(|ty| (Scope::Global, ty))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// The type of a literal value.
#[must_use]
pub const fn literal_type(literal: &Literal) -> Type {
    match literal {
        Literal::Integer(_) => Type::Integer,
        Literal::Real(_) => Type::Real,
        Literal::Str(_) => Type::String,
        Literal::Boolean(_) => Type::Boolean,
    }
}
