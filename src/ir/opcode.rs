//! Opcode tags.
#![allow(missing_docs)]

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Two-operand integer operators.
///
/// Both operands and the result share one integer type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    // ========================================================================
    // Arithmetic
    // ========================================================================
    Add,
    Sub,
    Mul,

    // ========================================================================
    // Division and remainder
    // ========================================================================
    UDiv,
    SDiv,
    URem,
    SRem,

    // ========================================================================
    // Shifts
    // ========================================================================
    Shl,
    LShr,
    AShr,

    // ========================================================================
    // Bitwise
    // ========================================================================
    And,
    Or,
    Xor,
}

impl BinaryOp {
    /// Division or remainder; undefined for a zero divisor.
    #[must_use]
    pub fn is_division(self) -> bool {
        matches!(
            self,
            BinaryOp::UDiv | BinaryOp::SDiv | BinaryOp::URem | BinaryOp::SRem
        )
    }

    #[must_use]
    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::LShr | BinaryOp::AShr)
    }

    /// Operators that read their operands as two's complement signed values.
    #[must_use]
    pub fn is_signed(self) -> bool {
        matches!(self, BinaryOp::SDiv | BinaryOp::SRem | BinaryOp::AShr)
    }

    #[must_use]
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Mul | BinaryOp::And | BinaryOp::Or | BinaryOp::Xor
        )
    }
}

/// Integer comparison predicates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum CmpPredicate {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

#[cfg(test)]
mod tests {
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[test]
    fn test_binary_op_names() {
        assert_eq!(BinaryOp::LShr.to_string(), "lshr");
        assert_eq!(BinaryOp::SDiv.to_string(), "sdiv");
        let name: &'static str = BinaryOp::URem.into();
        assert_eq!(name, "urem");
    }

    #[test]
    fn test_binary_op_classes() {
        assert_eq!(BinaryOp::COUNT, 13);
        assert_eq!(BinaryOp::iter().filter(|op| op.is_division()).count(), 4);
        assert_eq!(BinaryOp::iter().filter(|op| op.is_shift()).count(), 3);
        assert!(BinaryOp::AShr.is_signed());
        assert!(!BinaryOp::LShr.is_signed());
    }

    #[test]
    fn test_predicate_names() {
        assert_eq!(CmpPredicate::Eq.to_string(), "eq");
        assert_eq!(CmpPredicate::Sle.to_string(), "sle");
        assert_eq!(CmpPredicate::COUNT, 10);
    }
}
