//! Operand references.
//!
//! A [`Value`] is what an instruction operand points at. Constant-ness is a structural
//! property of the operand: an operand is constant exactly when it is a
//! [`Value::Const`], no analysis is involved.

use std::fmt;

use crate::ir::{ApInt, InstId, IrType};

/// Index of a function parameter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamId(pub(crate) usize);

impl ParamId {
    /// Creates a parameter identifier from its position in the signature.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        ParamId(index)
    }

    /// Position of the parameter in the signature.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arg{}", self.0)
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%arg{}", self.0)
    }
}

/// An operand: a literal, the undefined-result marker, a parameter or an instruction result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Integer literal.
    Const(ApInt),
    /// Undefined result of the given type, e.g. a folded division by zero.
    ///
    /// Poison is never numeric; it is not folded further.
    Poison(IrType),
    /// Function parameter.
    Param(ParamId),
    /// Result of another instruction in the same function.
    Inst(InstId),
}

impl Value {
    /// An `i32` literal.
    #[must_use]
    pub fn i32(value: i32) -> Self {
        Value::Const(ApInt::from_i32(value))
    }

    /// An `i8` literal.
    #[must_use]
    pub fn i8(value: i8) -> Self {
        Value::Const(ApInt::from_i8(value))
    }

    /// An `i1` literal.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Value::Const(ApInt::from_bool(value))
    }

    /// The integer payload, if this is a literal.
    #[must_use]
    pub fn as_const(&self) -> Option<&ApInt> {
        match self {
            Value::Const(value) => Some(value),
            _ => None,
        }
    }

    /// The producing instruction, if this is an instruction result.
    #[must_use]
    pub fn as_inst(&self) -> Option<InstId> {
        match self {
            Value::Inst(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns `true` for integer literals.
    #[must_use]
    pub fn is_const(&self) -> bool {
        matches!(self, Value::Const(_))
    }

    /// Returns `true` for the undefined-result marker.
    #[must_use]
    pub fn is_poison(&self) -> bool {
        matches!(self, Value::Poison(_))
    }
}

impl From<ApInt> for Value {
    fn from(value: ApInt) -> Self {
        Value::Const(value)
    }
}

impl From<InstId> for Value {
    fn from(id: InstId) -> Self {
        Value::Inst(id)
    }
}

impl From<ParamId> for Value {
    fn from(id: ParamId) -> Self {
        Value::Param(id)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(value) => write!(f, "{value}"),
            Value::Poison(_) => f.write_str("poison"),
            Value::Param(id) => write!(f, "{id}"),
            Value::Inst(id) => write!(f, "{id}"),
        }
    }
}
