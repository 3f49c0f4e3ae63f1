//! Instructions.
//!
//! An [`Instruction`] is an opcode ([`InstKind`]) with its operands, a result type and the
//! block that owns it. Instructions live in the arena of their [`crate::ir::Function`] and
//! are addressed by [`InstId`]; the identifier stays valid until the instruction is erased
//! and is never reused.

use std::fmt;

use crate::ir::{BinaryOp, BlockId, CmpPredicate, IrType, Value};

/// Stable identifier of an instruction within its function.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstId(pub(crate) usize);

impl InstId {
    /// Creates an instruction identifier from a raw arena index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        InstId(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstId({})", self.0)
    }
}

impl fmt::Display for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Opcode and operands of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstKind {
    /// Integer binary operator; the only kind the constant folder evaluates.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Value,
        /// Right operand.
        rhs: Value,
    },
    /// Integer comparison producing an `i1`.
    ICmp {
        /// The comparison predicate.
        pred: CmpPredicate,
        /// Left operand.
        lhs: Value,
        /// Right operand.
        rhs: Value,
    },
    /// Stack slot for one value of `allocated`.
    Alloca {
        /// Type of the slot contents.
        allocated: IrType,
    },
    /// Read from memory; the loaded type is the instruction result type.
    Load {
        /// Address to read from.
        ptr: Value,
    },
    /// Write to memory.
    Store {
        /// The value written.
        value: Value,
        /// Address to write to.
        ptr: Value,
    },
    /// Direct call by symbol name.
    Call {
        /// Name of the called function.
        callee: String,
        /// Actual arguments.
        args: Vec<Value>,
    },
    /// Unconditional branch.
    Br {
        /// Successor block.
        target: BlockId,
    },
    /// Two-way conditional branch on an `i1`.
    CondBr {
        /// Branch condition.
        cond: Value,
        /// Successor taken when `cond` is true.
        then_block: BlockId,
        /// Successor taken when `cond` is false.
        else_block: BlockId,
    },
    /// Function return.
    Ret {
        /// Returned value, `None` for `ret void`.
        value: Option<Value>,
    },
    /// SSA merge of one value per predecessor.
    Phi {
        /// `(value, predecessor)` pairs.
        incoming: Vec<(Value, BlockId)>,
    },
}

impl InstKind {
    /// Mnemonic used by the textual printer.
    #[must_use]
    pub fn mnemonic(&self) -> &'static str {
        match self {
            InstKind::Binary { op, .. } => (*op).into(),
            InstKind::ICmp { .. } => "icmp",
            InstKind::Alloca { .. } => "alloca",
            InstKind::Load { .. } => "load",
            InstKind::Store { .. } => "store",
            InstKind::Call { .. } => "call",
            InstKind::Br { .. } | InstKind::CondBr { .. } => "br",
            InstKind::Ret { .. } => "ret",
            InstKind::Phi { .. } => "phi",
        }
    }
}

/// A single instruction owned by a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Opcode and operands.
    pub(crate) kind: InstKind,
    /// Result type, [`IrType::Void`] if the instruction produces no value.
    pub(crate) ty: IrType,
    /// Owning block.
    pub(crate) block: BlockId,
    /// Optional result name used by the printer.
    pub(crate) name: Option<String>,
}

impl Instruction {
    pub(crate) fn new(kind: InstKind, ty: IrType, block: BlockId, name: Option<String>) -> Self {
        Instruction {
            kind,
            ty,
            block,
            name,
        }
    }

    /// Opcode and operands.
    #[must_use]
    pub fn kind(&self) -> &InstKind {
        &self.kind
    }

    /// Result type.
    #[must_use]
    pub fn ty(&self) -> &IrType {
        &self.ty
    }

    /// The block this instruction belongs to.
    #[must_use]
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Result name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Operator and operands, if this is a binary operator.
    #[must_use]
    pub fn as_binary(&self) -> Option<(BinaryOp, &Value, &Value)> {
        match &self.kind {
            InstKind::Binary { op, lhs, rhs } => Some((*op, lhs, rhs)),
            _ => None,
        }
    }

    /// Returns `true` for binary operators.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self.kind, InstKind::Binary { .. })
    }

    /// Returns `true` for instructions that end a block.
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        matches!(
            self.kind,
            InstKind::Br { .. } | InstKind::CondBr { .. } | InstKind::Ret { .. }
        )
    }

    /// All value operands, in operand order.
    #[must_use]
    pub fn operands(&self) -> Vec<&Value> {
        match &self.kind {
            InstKind::Binary { lhs, rhs, .. } | InstKind::ICmp { lhs, rhs, .. } => {
                vec![lhs, rhs]
            }
            InstKind::Alloca { .. } | InstKind::Br { .. } => Vec::new(),
            InstKind::Load { ptr } => vec![ptr],
            InstKind::Store { value, ptr } => vec![value, ptr],
            InstKind::Call { args, .. } => args.iter().collect(),
            InstKind::CondBr { cond, .. } => vec![cond],
            InstKind::Ret { value } => value.iter().collect(),
            InstKind::Phi { incoming } => incoming.iter().map(|(value, _)| value).collect(),
        }
    }

    /// Mutable access to all value operands, in operand order.
    pub(crate) fn operands_mut(&mut self) -> Vec<&mut Value> {
        match &mut self.kind {
            InstKind::Binary { lhs, rhs, .. } | InstKind::ICmp { lhs, rhs, .. } => {
                vec![lhs, rhs]
            }
            InstKind::Alloca { .. } | InstKind::Br { .. } => Vec::new(),
            InstKind::Load { ptr } => vec![ptr],
            InstKind::Store { value, ptr } => vec![value, ptr],
            InstKind::Call { args, .. } => args.iter_mut().collect(),
            InstKind::CondBr { cond, .. } => vec![cond],
            InstKind::Ret { value } => value.iter_mut().collect(),
            InstKind::Phi { incoming } => incoming.iter_mut().map(|(value, _)| value).collect(),
        }
    }

    /// Instructions whose results this instruction reads.
    #[must_use]
    pub fn inst_operands(&self) -> Vec<InstId> {
        self.operands()
            .into_iter()
            .filter_map(Value::as_inst)
            .collect()
    }

    /// Blocks referenced by this instruction: branch targets and phi predecessors.
    #[must_use]
    pub fn referenced_blocks(&self) -> Vec<BlockId> {
        match &self.kind {
            InstKind::Phi { incoming } => incoming.iter().map(|(_, block)| *block).collect(),
            _ => self.successors(),
        }
    }

    /// Control-flow successors, empty unless this is a branch.
    #[must_use]
    pub fn successors(&self) -> Vec<BlockId> {
        match &self.kind {
            InstKind::Br { target } => vec![*target],
            InstKind::CondBr {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            _ => Vec::new(),
        }
    }
}
