//! Runtime frames and storage locations.
//!
//! A frame maps names onto bindings. Most bindings own their slot; a
//! `BYREF` parameter instead aliases a slot owned by the caller, possibly
//! projected into an array element or record field. Slots are shared
//! through `Rc<RefCell<..>>` so an alias stays valid for exactly as long as
//! the activation that created it.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::Position,
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{evaluator::core::EvalResult, types::Type, value::Value},
};

/// One storage cell: the declared type and the current value.
#[derive(Debug)]
pub struct Slot {
    /// The declared type of the variable this slot backs.
    pub ty:    Type,
    /// The current value; [`Value::Null`] until first assignment.
    pub value: Value,
}

/// A shared handle to a slot.
pub type SlotRef = Rc<RefCell<Slot>>;

/// One step of an already-evaluated place path.
#[derive(Debug, Clone)]
pub enum ResolvedStep {
    /// Array indexing with evaluated index values.
    Index(Vec<i64>),
    /// Record field access.
    Field(String),
}

/// What a name in a frame refers to.
#[derive(Debug, Clone)]
pub enum Binding {
    /// The name owns (or directly shares) a whole slot.
    Direct(SlotRef),
    /// The name aliases a location inside another binding's slot, as a
    /// `BYREF` parameter bound to an array element or record field does.
    Projected {
        /// The slot the path starts from.
        base:  SlotRef,
        /// Index and field steps from the base value to the location.
        steps: Vec<ResolvedStep>,
    },
}

/// A mapping from names to bindings: the global frame, or one callable
/// activation.
#[derive(Debug, Default)]
pub struct Frame {
    bindings: HashMap<String, Binding>,
}

impl Frame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh slot for a declared variable. A redeclaration (for
    /// example a `DECLARE` inside a loop body) replaces the previous slot.
    pub fn declare(&mut self, name: &str, ty: Type, value: Value) {
        let slot = Rc::new(RefCell::new(Slot { ty, value }));
        self.bindings.insert(name.to_string(), Binding::Direct(slot));
    }

    /// Binds a name to an existing binding, as parameter passing does.
    pub fn bind(&mut self, name: &str, binding: Binding) {
        self.bindings.insert(name.to_string(), binding);
    }

    /// Looks the name up in this frame.
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).cloned()
    }
}

fn step_into<'v>(value: &'v Value, step: &ResolvedStep, pos: Position) -> EvalResult<&'v Value> {
    match (value, step) {
        (Value::Array(array), ResolvedStep::Index(indexes)) => {
            array.element(indexes).ok_or_else(|| {
                                      RuntimeError::new(RuntimeErrorKind::IndexOutOfBounds {
                                          indexes: indexes.clone(),
                                      },
                                                        pos)
                                  })
        },
        (Value::Record(record), ResolvedStep::Field(field)) => {
            record.field(field).ok_or_else(|| {
                                   RuntimeError::new(RuntimeErrorKind::UnexpectedType {
                                       expected: "a record with this field",
                                   },
                                                     pos)
                               })
        },
        (_, ResolvedStep::Index(_)) => {
            Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected: "an ARRAY value" },
                                  pos))
        },
        (_, ResolvedStep::Field(_)) => {
            Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected: "a RECORD value" },
                                  pos))
        },
    }
}

fn step_into_mut<'v>(value: &'v mut Value,
                     step: &ResolvedStep,
                     pos: Position)
                     -> EvalResult<&'v mut Value> {
    match (value, step) {
        (Value::Array(array), ResolvedStep::Index(indexes)) => {
            array.element_mut(indexes).ok_or_else(|| {
                                          RuntimeError::new(RuntimeErrorKind::IndexOutOfBounds {
                                              indexes: indexes.clone(),
                                          },
                                                            pos)
                                      })
        },
        (Value::Record(record), ResolvedStep::Field(field)) => {
            record.field_mut(field).ok_or_else(|| {
                                       RuntimeError::new(RuntimeErrorKind::UnexpectedType {
                                           expected: "a record with this field",
                                       },
                                                         pos)
                                   })
        },
        (_, ResolvedStep::Index(_)) => {
            Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected: "an ARRAY value" },
                                  pos))
        },
        (_, ResolvedStep::Field(_)) => {
            Err(RuntimeError::new(RuntimeErrorKind::UnexpectedType { expected: "a RECORD value" },
                                  pos))
        },
    }
}

/// Reads the value a binding (plus trailing steps) refers to.
///
/// Index expressions must already be evaluated; no user code runs while the
/// slot is borrowed.
pub fn read_binding(binding: &Binding,
                    extra: &[ResolvedStep],
                    pos: Position)
                    -> EvalResult<Value> {
    let (base, steps) = match binding {
        Binding::Direct(slot) => (slot, &[][..]),
        Binding::Projected { base, steps } => (base, steps.as_slice()),
    };
    let slot = base.borrow();
    let mut value: &Value = &slot.value;
    for step in steps.iter().chain(extra) {
        value = step_into(value, step, pos)?;
    }
    Ok(value.clone())
}

/// Writes a value through a binding (plus trailing steps).
///
/// Index expressions must already be evaluated; no user code runs while the
/// slot is borrowed.
pub fn write_binding(binding: &Binding,
                     extra: &[ResolvedStep],
                     new_value: Value,
                     pos: Position)
                     -> EvalResult<()> {
    let (base, steps) = match binding {
        Binding::Direct(slot) => (slot, &[][..]),
        Binding::Projected { base, steps } => (base, steps.as_slice()),
    };
    let mut slot = base.borrow_mut();
    let mut value: &mut Value = &mut slot.value;
    for step in steps.iter().chain(extra) {
        value = step_into_mut(value, step, pos)?;
    }
    *value = new_value;
    Ok(())
}

/// Extends a binding with further steps, producing the binding a `BYREF`
/// parameter receives for an element or field argument.
#[must_use]
pub fn project_binding(binding: Binding, extra: Vec<ResolvedStep>) -> Binding {
    if extra.is_empty() {
        return binding;
    }
    match binding {
        Binding::Direct(slot) => Binding::Projected { base:  slot,
                                                      steps: extra, },
        Binding::Projected { base, mut steps } => {
            steps.extend(extra);
            Binding::Projected { base, steps }
        },
    }
}
