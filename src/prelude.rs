//! # ssafold Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the ssafold library. Import this module to build functions and fold them.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all ssafold operations
pub use crate::Error;

/// The result type used throughout ssafold
pub use crate::Result;

// ================================================================================================
// Intermediate Representation
// ================================================================================================

/// Integers, types and operand values
pub use crate::ir::{ApInt, IrType, Value};

/// Opcodes
pub use crate::ir::{BinaryOp, CmpPredicate};

/// Functions, blocks and instructions
pub use crate::ir::{
    BasicBlock, BlockId, Function, FunctionType, InstId, InstKind, Instruction, Module, ParamId,
};

/// Construction, control flow and verification
pub use crate::ir::{verify, Callee, FunctionBuilder, FunctionCfg};

// ================================================================================================
// Passes
// ================================================================================================

/// The constant folding pass and its statistics
pub use crate::compiler::{ConstantFoldingPass, FoldStats};

/// Pass infrastructure
pub use crate::compiler::{
    CompilerConfig, CompilerContext, EventKind, EventLog, FunctionPass, PassScheduler,
};
