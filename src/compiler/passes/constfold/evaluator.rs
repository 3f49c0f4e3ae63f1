//! Compile-time evaluation of binary operators.
//!
//! Results follow two's-complement machine semantics at the operand width: arithmetic
//! wraps, shifts by the width or more saturate, and a zero divisor produces poison
//! instead of trapping.

use crate::ir::{ApInt, BinaryOp, Instruction, IrType, Value};

/// Evaluates `inst` if it is a binary operator whose operands are both literal integers.
///
/// Returns `None` for every other instruction, including binary operators that read a
/// parameter, another instruction or poison.
#[must_use]
pub fn evaluate(inst: &Instruction) -> Option<Value> {
    let (op, lhs, rhs) = inst.as_binary()?;
    let (Value::Const(lhs), Value::Const(rhs)) = (lhs, rhs) else {
        return None;
    };
    fold_binary(op, lhs, rhs, inst.ty())
}

/// Computes `lhs op rhs` as a value of type `ty`.
///
/// Division and remainder by zero yield [`Value::Poison`]. Returns `None` if the
/// operand widths disagree with each other or with `ty`.
#[must_use]
pub fn fold_binary(op: BinaryOp, lhs: &ApInt, rhs: &ApInt, ty: &IrType) -> Option<Value> {
    if lhs.width() != rhs.width() || ty.int_width() != Some(lhs.width()) {
        return None;
    }

    // widths agree from here on, so `None` only means a zero divisor
    let result = match op {
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Sub => lhs.wrapping_sub(rhs),
        BinaryOp::Mul => lhs.wrapping_mul(rhs),
        BinaryOp::UDiv => lhs.checked_udiv(rhs),
        BinaryOp::SDiv => lhs.checked_sdiv(rhs),
        BinaryOp::URem => lhs.checked_urem(rhs),
        BinaryOp::SRem => lhs.checked_srem(rhs),
        BinaryOp::Shl => lhs.shl(rhs),
        BinaryOp::LShr => lhs.lshr(rhs),
        BinaryOp::AShr => lhs.ashr(rhs),
        BinaryOp::And => lhs.and(rhs),
        BinaryOp::Or => lhs.or(rhs),
        BinaryOp::Xor => lhs.xor(rhs),
    };

    Some(match result {
        Some(value) => Value::Const(value),
        None => Value::Poison(ty.clone()),
    })
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn fold_i32(op: BinaryOp, lhs: i32, rhs: i32) -> Value {
        fold_binary(
            op,
            &ApInt::from_i32(lhs),
            &ApInt::from_i32(rhs),
            &IrType::I32,
        )
        .unwrap()
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(fold_i32(BinaryOp::Add, 3, 5), Value::i32(8));
        assert_eq!(fold_i32(BinaryOp::Add, i32::MAX, 1), Value::i32(i32::MIN));
        assert_eq!(fold_i32(BinaryOp::Sub, i32::MIN, 1), Value::i32(i32::MAX));
        assert_eq!(fold_i32(BinaryOp::Mul, 0x1000_0000, 16), Value::i32(0));
        assert_eq!(fold_i32(BinaryOp::Mul, -7, 6), Value::i32(-42));
    }

    #[test]
    fn test_signed_vs_unsigned_division() {
        assert_eq!(fold_i32(BinaryOp::SDiv, -7, 2), Value::i32(-3));
        assert_eq!(fold_i32(BinaryOp::SRem, -7, 2), Value::i32(-1));
        assert_eq!(
            fold_i32(BinaryOp::UDiv, -7, 2),
            Value::i32(((-7i32 as u32) / 2) as i32)
        );
        assert_eq!(
            fold_i32(BinaryOp::URem, -7, 2),
            Value::i32(((-7i32 as u32) % 2) as i32)
        );
        assert_eq!(fold_i32(BinaryOp::SDiv, i32::MIN, -1), Value::i32(i32::MIN));
        assert_eq!(fold_i32(BinaryOp::SRem, i32::MIN, -1), Value::i32(0));
    }

    #[test]
    fn test_division_by_zero_is_poison() {
        for op in BinaryOp::iter().filter(|op| op.is_division()) {
            assert_eq!(fold_i32(op, 42, 0), Value::Poison(IrType::I32), "{op}");
        }
    }

    #[test]
    fn test_only_division_produces_poison() {
        for op in BinaryOp::iter().filter(|op| !op.is_division()) {
            assert!(!fold_i32(op, 42, 0).is_poison(), "{op}");
        }
    }

    #[test]
    fn test_shifts() {
        assert_eq!(fold_i32(BinaryOp::Shl, 1, 31), Value::i32(i32::MIN));
        assert_eq!(fold_i32(BinaryOp::LShr, -1, 28), Value::i32(0xF));
        assert_eq!(fold_i32(BinaryOp::AShr, -16, 2), Value::i32(-4));
        assert_eq!(fold_i32(BinaryOp::Shl, 1, 32), Value::i32(0));
        assert_eq!(fold_i32(BinaryOp::LShr, -1, 40), Value::i32(0));
        assert_eq!(fold_i32(BinaryOp::AShr, -1, 32), Value::i32(-1));
        assert_eq!(fold_i32(BinaryOp::AShr, 5, 99), Value::i32(0));
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(fold_i32(BinaryOp::And, 0b1100, 0b1010), Value::i32(0b1000));
        assert_eq!(fold_i32(BinaryOp::Or, 0b1100, 0b1010), Value::i32(0b1110));
        assert_eq!(fold_i32(BinaryOp::Xor, 0b1100, 0b1010), Value::i32(0b0110));
        assert_eq!(fold_i32(BinaryOp::Xor, -1, 0), Value::i32(-1));
    }

    #[test]
    fn test_narrow_width() {
        let fold_i8 = |op, lhs, rhs| {
            fold_binary(op, &ApInt::from_i8(lhs), &ApInt::from_i8(rhs), &IrType::I8).unwrap()
        };
        assert_eq!(fold_i8(BinaryOp::Add, 127, 1), Value::i8(-128));
        assert_eq!(fold_i8(BinaryOp::Mul, 16, 16), Value::i8(0));
        assert_eq!(fold_i8(BinaryOp::UDiv, -1, 2), Value::i8(127));
    }

    #[test]
    fn test_wide_width() {
        let ty = IrType::int(128).unwrap();
        let max = ApInt::all_ones(128).unwrap();
        let one = ApInt::from_u64(128, 1).unwrap();
        assert_eq!(
            fold_binary(BinaryOp::Add, &max, &one, &ty),
            Some(Value::Const(ApInt::zero(128).unwrap()))
        );
    }

    #[test]
    fn test_width_mismatch_not_folded() {
        let lhs = ApInt::from_i32(1);
        let rhs = ApInt::from_i8(1);
        assert_eq!(fold_binary(BinaryOp::Add, &lhs, &rhs, &IrType::I32), None);
        assert_eq!(fold_binary(BinaryOp::Add, &lhs, &lhs, &IrType::I8), None);
        assert_eq!(fold_binary(BinaryOp::Add, &lhs, &lhs, &IrType::Void), None);
    }
}
