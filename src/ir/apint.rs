//! Fixed-width arbitrary-precision integers.
//!
//! [`ApInt`] is the payload of every integer constant in the IR. The value is stored as an
//! unsigned bit pattern of exactly `width` bits; whether it is interpreted as signed or
//! unsigned is decided by the operation, never by the value itself. All arithmetic wraps
//! modulo `2^width`, so folding `i8 127 + 1` yields `-128` exactly as the target machine
//! would.
//!
//! Every two-operand operation requires both operands to have the same width and returns
//! `None` otherwise. Division and remainder also return `None` for a zero divisor. Callers
//! decide what an undefined result means; the constant folding pass checks widths first
//! and turns the remaining `None` into a poison value.

use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};

use crate::{Error, Result};

/// Largest supported integer width in bits.
pub const MAX_INT_WIDTH: u32 = 1 << 23;

/// A width-tagged two's complement integer.
///
/// # Invariants
///
/// - `1 <= width <= MAX_INT_WIDTH`
/// - `bits < 2^width`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApInt {
    width: u32,
    bits: BigUint,
}

fn modulus(width: u32) -> BigUint {
    BigUint::one() << width
}

fn check_width(width: u32) -> Result<()> {
    if width == 0 || width > MAX_INT_WIDTH {
        return Err(Error::InvalidWidth(width));
    }
    Ok(())
}

impl ApInt {
    /// Builds an integer from a pattern already reduced to `width` bits.
    fn raw(width: u32, bits: BigUint) -> Self {
        debug_assert!(bits < modulus(width));
        ApInt { width, bits }
    }

    fn truncating(width: u32, bits: BigUint) -> Self {
        ApInt::raw(width, bits % modulus(width))
    }

    fn from_signed_wrapping(width: u32, value: &BigInt) -> Self {
        let m = BigInt::from_biguint(Sign::Plus, modulus(width));
        let mut reduced = value % &m;
        if reduced.sign() == Sign::Minus {
            reduced += &m;
        }
        ApInt::raw(width, reduced.magnitude().clone())
    }

    /// Creates an integer from an unsigned bit pattern, truncating it to `width` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn new(width: u32, value: BigUint) -> Result<Self> {
        check_width(width)?;
        Ok(ApInt::truncating(width, value))
    }

    /// Creates an integer from a signed value, wrapping it into `width` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn from_bigint(width: u32, value: &BigInt) -> Result<Self> {
        check_width(width)?;
        Ok(ApInt::from_signed_wrapping(width, value))
    }

    /// Creates an integer from a `u64`, truncating it to `width` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn from_u64(width: u32, value: u64) -> Result<Self> {
        ApInt::new(width, BigUint::from(value))
    }

    /// Creates an integer from an `i64`, sign-extending or truncating it to `width` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn from_i64(width: u32, value: i64) -> Result<Self> {
        ApInt::from_bigint(width, &BigInt::from(value))
    }

    /// An `i1` holding `true` or `false`.
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        ApInt::raw(1, BigUint::from(u8::from(value)))
    }

    /// An `i8` constant.
    #[must_use]
    pub fn from_i8(value: i8) -> Self {
        ApInt::from_signed_wrapping(8, &BigInt::from(value))
    }

    /// An `i32` constant.
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        ApInt::from_signed_wrapping(32, &BigInt::from(value))
    }

    /// Zero at the given width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn zero(width: u32) -> Result<Self> {
        check_width(width)?;
        Ok(ApInt::raw(width, BigUint::zero()))
    }

    /// All bits set (`-1` when read as signed).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn all_ones(width: u32) -> Result<Self> {
        check_width(width)?;
        Ok(ApInt::raw(width, modulus(width) - 1u32))
    }

    /// The most negative signed value, only the sign bit set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn signed_min(width: u32) -> Result<Self> {
        check_width(width)?;
        Ok(ApInt::raw(width, BigUint::one() << (width - 1)))
    }

    /// Bit width of this integer.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The raw unsigned bit pattern.
    #[must_use]
    pub fn as_unsigned(&self) -> &BigUint {
        &self.bits
    }

    /// Returns `true` if every bit is clear.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    /// Returns `true` if the sign bit is set.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        !(&self.bits >> (self.width - 1)).is_zero()
    }

    /// Two's complement reading of the bit pattern.
    #[must_use]
    pub fn to_signed(&self) -> BigInt {
        let unsigned = BigInt::from_biguint(Sign::Plus, self.bits.clone());
        if self.is_negative() {
            unsigned - BigInt::from_biguint(Sign::Plus, modulus(self.width))
        } else {
            unsigned
        }
    }

    /// The unsigned value, if it fits into a `u64`.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.bits.to_u64()
    }

    /// The signed value, if it fits into an `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.to_signed().to_i64()
    }

    fn same_width(&self, rhs: &ApInt) -> Option<()> {
        (self.width == rhs.width).then_some(())
    }

    /// Shift amount clamped the way shifts consume it: anything `>= width` is `None`.
    fn shift_amount(&self, amount: &ApInt) -> Option<u32> {
        amount
            .bits
            .to_u32()
            .filter(|shift| *shift < self.width)
    }

    /// `self + rhs` modulo `2^width`, `None` if the widths differ.
    #[must_use]
    pub fn wrapping_add(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        Some(ApInt::truncating(self.width, &self.bits + &rhs.bits))
    }

    /// `self - rhs` modulo `2^width`, `None` if the widths differ.
    #[must_use]
    pub fn wrapping_sub(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        Some(ApInt::truncating(
            self.width,
            modulus(self.width) + &self.bits - &rhs.bits,
        ))
    }

    /// `self * rhs` modulo `2^width`, `None` if the widths differ.
    #[must_use]
    pub fn wrapping_mul(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        Some(ApInt::truncating(self.width, &self.bits * &rhs.bits))
    }

    /// Bitwise and, `None` if the widths differ.
    #[must_use]
    pub fn and(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        Some(ApInt::raw(self.width, &self.bits & &rhs.bits))
    }

    /// Bitwise or, `None` if the widths differ.
    #[must_use]
    pub fn or(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        Some(ApInt::raw(self.width, &self.bits | &rhs.bits))
    }

    /// Bitwise exclusive or, `None` if the widths differ.
    #[must_use]
    pub fn xor(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        Some(ApInt::raw(self.width, &self.bits ^ &rhs.bits))
    }

    /// Left shift; an amount of `width` or more clears every bit.
    ///
    /// The amount must have the same width as `self`, otherwise the result is `None`.
    #[must_use]
    pub fn shl(&self, amount: &ApInt) -> Option<ApInt> {
        self.same_width(amount)?;
        Some(match self.shift_amount(amount) {
            Some(shift) => ApInt::truncating(self.width, &self.bits << shift),
            None => ApInt::raw(self.width, BigUint::zero()),
        })
    }

    /// Logical right shift; an amount of `width` or more clears every bit.
    #[must_use]
    pub fn lshr(&self, amount: &ApInt) -> Option<ApInt> {
        self.same_width(amount)?;
        Some(match self.shift_amount(amount) {
            Some(shift) => ApInt::raw(self.width, &self.bits >> shift),
            None => ApInt::raw(self.width, BigUint::zero()),
        })
    }

    /// Arithmetic right shift; an amount of `width` or more fills every bit with the sign.
    #[must_use]
    pub fn ashr(&self, amount: &ApInt) -> Option<ApInt> {
        self.same_width(amount)?;
        Some(match self.shift_amount(amount) {
            // BigInt shifts round toward negative infinity, which is sign filling
            Some(shift) => ApInt::from_signed_wrapping(self.width, &(self.to_signed() >> shift)),
            None if self.is_negative() => ApInt::raw(self.width, modulus(self.width) - 1u32),
            None => ApInt::raw(self.width, BigUint::zero()),
        })
    }

    /// Unsigned division, `None` for a zero divisor or differing widths.
    #[must_use]
    pub fn checked_udiv(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        if rhs.is_zero() {
            return None;
        }
        Some(ApInt::raw(self.width, &self.bits / &rhs.bits))
    }

    /// Unsigned remainder, `None` for a zero divisor or differing widths.
    #[must_use]
    pub fn checked_urem(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        if rhs.is_zero() {
            return None;
        }
        Some(ApInt::raw(self.width, &self.bits % &rhs.bits))
    }

    /// Signed division truncating toward zero, `None` for a zero divisor or differing
    /// widths.
    ///
    /// `MIN / -1` overflows and wraps back to `MIN`.
    #[must_use]
    pub fn checked_sdiv(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        if rhs.is_zero() {
            return None;
        }
        let quotient = self.to_signed() / rhs.to_signed();
        Some(ApInt::from_signed_wrapping(self.width, &quotient))
    }

    /// Signed remainder with the sign of the dividend, `None` for a zero divisor or
    /// differing widths.
    #[must_use]
    pub fn checked_srem(&self, rhs: &ApInt) -> Option<ApInt> {
        self.same_width(rhs)?;
        if rhs.is_zero() {
            return None;
        }
        let remainder = self.to_signed() % rhs.to_signed();
        Some(ApInt::from_signed_wrapping(self.width, &remainder))
    }
}

impl fmt::Display for ApInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 1 {
            return f.write_str(if self.is_zero() { "false" } else { "true" });
        }
        write!(f, "{}", self.to_signed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i32v(value: i32) -> ApInt {
        ApInt::from_i32(value)
    }

    #[test]
    fn test_width_validation() {
        assert!(matches!(ApInt::from_u64(0, 1), Err(Error::InvalidWidth(0))));
        assert!(matches!(
            ApInt::zero(MAX_INT_WIDTH + 1),
            Err(Error::InvalidWidth(_))
        ));
        assert!(ApInt::from_u64(MAX_INT_WIDTH, 1).is_ok());
    }

    #[test]
    fn test_construction_truncates() {
        let value = ApInt::from_u64(8, 0x1FF).unwrap();
        assert_eq!(value.to_u64(), Some(0xFF));
        assert_eq!(value.to_i64(), Some(-1));

        let negative = ApInt::from_i64(16, -2).unwrap();
        assert_eq!(negative.to_u64(), Some(0xFFFE));
        assert!(negative.is_negative());
    }

    #[test]
    fn test_signed_reading() {
        assert_eq!(ApInt::signed_min(32).unwrap().to_i64(), Some(i64::from(i32::MIN)));
        assert_eq!(ApInt::all_ones(32).unwrap().to_i64(), Some(-1));
        assert_eq!(i32v(42).to_signed(), BigInt::from(42));
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(i32v(i32::MAX).wrapping_add(&i32v(1)), Some(i32v(i32::MIN)));
        assert_eq!(i32v(i32::MIN).wrapping_sub(&i32v(1)), Some(i32v(i32::MAX)));
        assert_eq!(i32v(0x1000_0000).wrapping_mul(&i32v(16)), Some(i32v(0)));
        assert_eq!(i32v(5).wrapping_sub(&i32v(7)), Some(i32v(-2)));
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(i32v(0b1100).and(&i32v(0b1010)), Some(i32v(0b1000)));
        assert_eq!(i32v(0b1100).or(&i32v(0b1010)), Some(i32v(0b1110)));
        assert_eq!(i32v(0b1100).xor(&i32v(0b1010)), Some(i32v(0b0110)));
        assert_eq!(i32v(-1).xor(&i32v(0)), Some(i32v(-1)));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(i32v(1).shl(&i32v(31)), Some(i32v(i32::MIN)));
        assert_eq!(i32v(-1).lshr(&i32v(28)), Some(i32v(0xF)));
        assert_eq!(i32v(-16).ashr(&i32v(2)), Some(i32v(-4)));
        assert_eq!(i32v(16).ashr(&i32v(2)), Some(i32v(4)));
    }

    #[test]
    fn test_oversized_shifts() {
        assert_eq!(i32v(1).shl(&i32v(32)), Some(i32v(0)));
        assert_eq!(i32v(-1).lshr(&i32v(40)), Some(i32v(0)));
        assert_eq!(i32v(-8).ashr(&i32v(32)), Some(i32v(-1)));
        assert_eq!(i32v(8).ashr(&i32v(-1)), Some(i32v(0)));
    }

    #[test]
    fn test_division_by_zero() {
        let zero = i32v(0);
        assert!(i32v(7).checked_sdiv(&zero).is_none());
        assert!(i32v(7).checked_udiv(&zero).is_none());
        assert!(i32v(7).checked_srem(&zero).is_none());
        assert!(i32v(7).checked_urem(&zero).is_none());
    }

    #[test]
    fn test_signed_division() {
        assert_eq!(i32v(-7).checked_sdiv(&i32v(2)), Some(i32v(-3)));
        assert_eq!(i32v(-7).checked_srem(&i32v(2)), Some(i32v(-1)));
        assert_eq!(i32v(7).checked_srem(&i32v(-2)), Some(i32v(1)));
        assert_eq!(i32v(i32::MIN).checked_sdiv(&i32v(-1)), Some(i32v(i32::MIN)));
        assert_eq!(i32v(i32::MIN).checked_srem(&i32v(-1)), Some(i32v(0)));
    }

    #[test]
    fn test_unsigned_division() {
        // -2 is 0xFFFF_FFFE unsigned
        assert_eq!(i32v(-2).checked_udiv(&i32v(2)), Some(i32v(0x7FFF_FFFF)));
        assert_eq!(i32v(-1).checked_urem(&i32v(10)), Some(i32v(5)));
    }

    #[test]
    fn test_wide_values() {
        let wide = ApInt::all_ones(128).unwrap();
        let one = ApInt::from_u64(128, 1).unwrap();
        assert!(wide.wrapping_add(&one).unwrap().is_zero());
        assert_eq!(wide.to_u64(), None);
        assert_eq!(wide.to_i64(), Some(-1));
    }

    #[test]
    fn test_mismatched_widths() {
        let narrow = ApInt::from_i8(1);
        let wide = ApInt::all_ones(64).unwrap();
        let same = ApInt::from_i8(3);

        assert_eq!(narrow.wrapping_sub(&wide), None);
        assert_eq!(narrow.wrapping_add(&wide), None);
        assert_eq!(narrow.wrapping_mul(&wide), None);
        assert_eq!(narrow.or(&ApInt::all_ones(32).unwrap()), None);
        assert_eq!(narrow.and(&wide), None);
        assert_eq!(narrow.xor(&wide), None);
        assert_eq!(narrow.shl(&wide), None);
        assert_eq!(narrow.lshr(&wide), None);
        assert_eq!(narrow.ashr(&wide), None);
        assert_eq!(narrow.checked_udiv(&wide), None);
        assert_eq!(narrow.checked_sdiv(&wide), None);
        assert_eq!(narrow.checked_urem(&wide), None);
        assert_eq!(narrow.checked_srem(&wide), None);

        let merged = narrow.or(&same).unwrap();
        assert_eq!(merged.width(), 8);
        assert_eq!(merged.to_u64(), Some(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(i32v(-5).to_string(), "-5");
        assert_eq!(ApInt::from_u64(8, 200).unwrap().to_string(), "-56");
        assert_eq!(ApInt::from_bool(true).to_string(), "true");
    }
}
