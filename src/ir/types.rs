//! First-class IR types and function signatures.

use std::fmt;

use crate::{ir::MAX_INT_WIDTH, Error, Result};

/// The type of an IR value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    /// Integer of the given bit width.
    Int(u32),
    /// Opaque pointer.
    Ptr,
    /// No value; the result type of stores, branches and void calls.
    Void,
}

impl IrType {
    /// `i1`, the result type of comparisons.
    pub const I1: IrType = IrType::Int(1);
    /// `i8`.
    pub const I8: IrType = IrType::Int(8);
    /// `i16`.
    pub const I16: IrType = IrType::Int(16);
    /// `i32`.
    pub const I32: IrType = IrType::Int(32);
    /// `i64`.
    pub const I64: IrType = IrType::Int(64);

    /// Creates an integer type, validating the width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] if `width` is outside `1..=MAX_INT_WIDTH`.
    pub fn int(width: u32) -> Result<Self> {
        if width == 0 || width > MAX_INT_WIDTH {
            return Err(Error::InvalidWidth(width));
        }
        Ok(IrType::Int(width))
    }

    /// The bit width, if this is an integer type.
    #[must_use]
    pub fn int_width(&self) -> Option<u32> {
        match self {
            IrType::Int(width) => Some(*width),
            IrType::Ptr | IrType::Void => None,
        }
    }

    /// Returns `true` for integer types.
    #[must_use]
    pub fn is_int(&self) -> bool {
        matches!(self, IrType::Int(_))
    }

    /// Returns `true` for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, IrType::Void)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Int(width) => write!(f, "i{width}"),
            IrType::Ptr => f.write_str("ptr"),
            IrType::Void => f.write_str("void"),
        }
    }
}

/// Parameter and return types of a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Parameter types in declaration order.
    pub params: Vec<IrType>,
    /// Return type, [`IrType::Void`] for procedures.
    pub ret: IrType,
}

impl FunctionType {
    /// Creates a new signature.
    #[must_use]
    pub fn new(params: Vec<IrType>, ret: IrType) -> Self {
        FunctionType { params, ret }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.ret)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_validation() {
        assert_eq!(IrType::int(32).unwrap(), IrType::I32);
        assert!(matches!(IrType::int(0), Err(Error::InvalidWidth(0))));
    }

    #[test]
    fn test_display() {
        assert_eq!(IrType::I1.to_string(), "i1");
        assert_eq!(IrType::Ptr.to_string(), "ptr");
        let sig = FunctionType::new(vec![IrType::I32, IrType::I32], IrType::Void);
        assert_eq!(sig.to_string(), "void (i32, i32)");
    }

    #[test]
    fn test_int_width() {
        assert_eq!(IrType::I64.int_width(), Some(64));
        assert_eq!(IrType::Ptr.int_width(), None);
        assert!(IrType::Void.is_void());
    }
}
