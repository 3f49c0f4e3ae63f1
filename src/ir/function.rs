//! Function representation - blocks, instructions and the use-list index.
//!
//! A [`Function`] owns every block and instruction of one body. Instructions are stored
//! in an arena indexed by [`InstId`]; blocks hold ordered lists of those identifiers.
//! Next to the arena the function maintains a use-list index mapping every instruction
//! to the set of instructions that read its result, which makes
//! [`Function::replace_all_uses_with`] proportional to the number of users instead of the
//! size of the function.
//!
//! # Structure
//!
//! ```text
//! Function
//! ├── params: Vec<Param>                // signature, addressed by ParamId
//! ├── blocks: Vec<BasicBlock>           // block 0 is the entry
//! ├── insts:  Vec<Option<Instruction>>  // arena, None once erased
//! └── users:  Vec<BTreeSet<InstId>>     // producer -> consumers
//! ```
//!
//! A function without blocks is a declaration of an external symbol.

use std::{collections::BTreeSet, fmt};

use crate::{
    ir::{
        BasicBlock, BlockId, FunctionType, InstId, InstKind, Instruction, IrType, ParamId, Value,
    },
    Error, Result,
};

/// A formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Printer name, `None` prints as `%argN`.
    pub name: Option<String>,
    /// Parameter type.
    pub ty: IrType,
}

/// A function body (or declaration) in SSA form.
///
/// # Examples
///
/// ```rust
/// use ssafold::ir::{BinaryOp, Function, FunctionType, InstKind, IrType, Value};
///
/// let mut function = Function::new("f", FunctionType::new(vec![], IrType::I32));
/// let entry = function.add_block("entry");
/// let sum = function.append_instruction(
///     entry,
///     InstKind::Binary { op: BinaryOp::Add, lhs: Value::i32(5), rhs: Value::i32(3) },
///     IrType::I32,
///     Some("sum".into()),
/// )?;
/// function.append_instruction(
///     entry,
///     InstKind::Ret { value: Some(Value::Inst(sum)) },
///     IrType::Void,
///     None,
/// )?;
///
/// assert_eq!(function.use_count(sum), 1);
/// # Ok::<(), ssafold::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    name: String,
    params: Vec<Param>,
    ret: IrType,
    blocks: Vec<BasicBlock>,
    insts: Vec<Option<Instruction>>,
    users: Vec<BTreeSet<InstId>>,
}

impl Function {
    /// Creates an empty function (a declaration until the first block is added).
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FunctionType) -> Self {
        Function {
            name: name.into(),
            params: ty
                .params
                .into_iter()
                .map(|ty| Param { name: None, ty })
                .collect(),
            ret: ty.ret,
            blocks: Vec::new(),
            insts: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Symbol name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The signature of this function.
    #[must_use]
    pub fn signature(&self) -> FunctionType {
        FunctionType::new(
            self.params.iter().map(|param| param.ty.clone()).collect(),
            self.ret.clone(),
        )
    }

    /// Return type.
    #[must_use]
    pub fn return_type(&self) -> &IrType {
        &self.ret
    }

    /// Formal parameters.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The value of the parameter at `index`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<Value> {
        (index < self.params.len()).then_some(Value::Param(ParamId::new(index)))
    }

    /// Gives a parameter a printer name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the function has no such parameter.
    pub fn set_param_name(&mut self, param: ParamId, name: impl Into<String>) -> Result<()> {
        let slot = self
            .params
            .get_mut(param.index())
            .ok_or(Error::InvalidParam(param))?;
        slot.name = Some(name.into());
        Ok(())
    }

    /// Returns `true` if this function has no body.
    #[must_use]
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The entry block, `None` for declarations.
    #[must_use]
    pub fn entry(&self) -> Option<BlockId> {
        (!self.blocks.is_empty()).then_some(BlockId::new(0))
    }

    /// All blocks in layout order.
    #[must_use]
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Looks up a block.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    /// Appends a new, empty block and returns its identifier.
    pub fn add_block(&mut self, name: impl Into<String>) -> BlockId {
        let id = BlockId::new(self.blocks.len());
        self.blocks.push(BasicBlock::new(id, name));
        id
    }

    /// Looks up a live instruction.
    #[must_use]
    pub fn instruction(&self, id: InstId) -> Option<&Instruction> {
        self.insts.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns `true` if `id` names an instruction that has not been erased.
    #[must_use]
    pub fn is_live(&self, id: InstId) -> bool {
        self.instruction(id).is_some()
    }

    /// All live instructions in block layout order.
    pub fn instructions(&self) -> impl Iterator<Item = (InstId, &Instruction)> + '_ {
        self.blocks.iter().flat_map(move |block| {
            block
                .instructions()
                .iter()
                .filter_map(move |id| self.instruction(*id).map(|inst| (*id, inst)))
        })
    }

    /// Number of live instructions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.insts.iter().flatten().count()
    }

    /// Number of live binary operator instructions.
    #[must_use]
    pub fn binary_instruction_count(&self) -> usize {
        self.insts.iter().flatten().filter(|inst| inst.is_binary()).count()
    }

    /// Instructions reading the result of `id`, in identifier order.
    pub fn users(&self, id: InstId) -> impl Iterator<Item = InstId> + '_ {
        self.users.get(id.index()).into_iter().flatten().copied()
    }

    /// Number of instructions reading the result of `id`.
    #[must_use]
    pub fn use_count(&self, id: InstId) -> usize {
        self.users.get(id.index()).map_or(0, BTreeSet::len)
    }

    /// Control-flow successors of a block, taken from its terminator.
    #[must_use]
    pub fn successors(&self, block: BlockId) -> Vec<BlockId> {
        self.block(block)
            .and_then(BasicBlock::last)
            .and_then(|id| self.instruction(id))
            .map(Instruction::successors)
            .unwrap_or_default()
    }

    /// The type of an operand.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] or [`Error::InvalidInstruction`] for dangling
    /// references.
    pub fn value_type(&self, value: &Value) -> Result<IrType> {
        match value {
            Value::Const(constant) => Ok(IrType::Int(constant.width())),
            Value::Poison(ty) => Ok(ty.clone()),
            Value::Param(param) => self
                .params
                .get(param.index())
                .map(|param| param.ty.clone())
                .ok_or(Error::InvalidParam(*param)),
            Value::Inst(id) => self
                .instruction(*id)
                .map(|inst| inst.ty.clone())
                .ok_or(Error::InvalidInstruction(*id)),
        }
    }

    /// Appends an instruction to the end of `block` and registers its uses.
    ///
    /// This is the raw insertion primitive; it checks that every reference resolves but
    /// performs no type checking. [`crate::ir::FunctionBuilder`] layers type rules and
    /// terminator placement on top of it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`], [`Error::InvalidParam`] or
    /// [`Error::InvalidInstruction`] if the block or any operand does not resolve.
    pub fn append_instruction(
        &mut self,
        block: BlockId,
        kind: InstKind,
        ty: IrType,
        name: Option<String>,
    ) -> Result<InstId> {
        if self.block(block).is_none() {
            return Err(Error::InvalidBlock(block));
        }

        let inst = Instruction::new(kind, ty, block, name);
        for operand in inst.operands() {
            self.value_type(operand)?;
        }
        for target in inst.referenced_blocks() {
            if self.block(target).is_none() {
                return Err(Error::InvalidBlock(target));
            }
        }

        let id = InstId::new(self.insts.len());
        for producer in inst.inst_operands() {
            self.users[producer.index()].insert(id);
        }
        self.insts.push(Some(inst));
        self.users.push(BTreeSet::new());
        self.blocks[block.index()].push(id);
        Ok(id)
    }

    /// Redirects every use of `from`, function-wide, to `to`.
    ///
    /// Returns the number of operands that were rewritten. After this call `from` has
    /// no users and can be erased.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstruction`] if `from` is not live, an error if `to`
    /// does not resolve, and [`Error::Malformed`] if `to` is `from` itself.
    pub fn replace_all_uses_with(&mut self, from: InstId, to: Value) -> Result<usize> {
        if !self.is_live(from) {
            return Err(Error::InvalidInstruction(from));
        }
        self.value_type(&to)?;
        if to == Value::Inst(from) {
            return Err(malformed_error!("Cannot replace {} with itself", from));
        }

        let old = Value::Inst(from);
        let users = std::mem::take(&mut self.users[from.index()]);
        let mut rewritten = 0;
        for user in users {
            let Some(inst) = self.insts[user.index()].as_mut() else {
                return Err(malformed_error!("Use-list of {} names erased {}", from, user));
            };
            for operand in inst.operands_mut() {
                if *operand == old {
                    *operand = to.clone();
                    rewritten += 1;
                }
            }
            if let Value::Inst(target) = &to {
                self.users[target.index()].insert(user);
            }
        }
        Ok(rewritten)
    }

    /// Unlinks an instruction from its block and removes it from the arena.
    ///
    /// The identifier is never reused. Returns the removed instruction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstruction`] if `id` is not live and
    /// [`Error::InstructionInUse`] while other instructions still read its result.
    pub fn erase_instruction(&mut self, id: InstId) -> Result<Instruction> {
        if !self.is_live(id) {
            return Err(Error::InvalidInstruction(id));
        }
        let users = self.use_count(id);
        if users > 0 {
            return Err(Error::InstructionInUse { inst: id, users });
        }

        let Some(inst) = self.insts[id.index()].take() else {
            return Err(Error::InvalidInstruction(id));
        };
        if !self.blocks[inst.block.index()].remove(id) {
            return Err(malformed_error!("{} is not linked into {}", id, inst.block));
        }
        for producer in inst.inst_operands() {
            self.users[producer.index()].remove(&id);
        }
        Ok(inst)
    }

    /// Adds an incoming `(value, block)` pair to the phi `phi`.
    ///
    /// Loops need this: the value flowing along a back edge is usually defined after
    /// the phi that merges it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstruction`] if `phi` is not a live phi,
    /// [`Error::InvalidBlock`] for an unknown block and [`Error::TypeMismatch`] if
    /// `value` is not of the phi's type.
    pub fn add_phi_incoming(&mut self, phi: InstId, value: Value, block: BlockId) -> Result<()> {
        if self.block(block).is_none() {
            return Err(Error::InvalidBlock(block));
        }
        let found = self.value_type(&value)?;

        let Some(inst) = self.insts.get_mut(phi.index()).and_then(Option::as_mut) else {
            return Err(Error::InvalidInstruction(phi));
        };
        if found != inst.ty {
            return Err(Error::TypeMismatch {
                expected: inst.ty.clone(),
                found,
            });
        }
        let InstKind::Phi { incoming } = &mut inst.kind else {
            return Err(Error::InvalidInstruction(phi));
        };

        if let Value::Inst(producer) = &value {
            self.users[producer.index()].insert(phi);
        }
        incoming.push((value, block));
        Ok(())
    }

    /// Arena slots including erased ones, for the verifier.
    pub(crate) fn arena(&self) -> impl Iterator<Item = (InstId, Option<&Instruction>)> + '_ {
        self.insts
            .iter()
            .enumerate()
            .map(|(index, slot)| (InstId::new(index), slot.as_ref()))
    }

    fn value_name(&self, value: &Value) -> String {
        match value {
            Value::Param(param) => {
                match self.params.get(param.index()).and_then(|p| p.name.as_ref()) {
                    Some(name) => format!("%{name}"),
                    None => param.to_string(),
                }
            }
            Value::Inst(id) => match self.instruction(*id).and_then(Instruction::name) {
                Some(name) => format!("%{name}"),
                None => id.to_string(),
            },
            Value::Const(_) | Value::Poison(_) => value.to_string(),
        }
    }

    fn typed_value(&self, value: &Value) -> String {
        match self.value_type(value) {
            Ok(ty) => format!("{ty} {}", self.value_name(value)),
            Err(_) => format!("<dangling> {value}"),
        }
    }

    fn block_label(&self, block: BlockId) -> String {
        match self.block(block) {
            Some(block) => format!("%{}", block.name()),
            None => format!("%{block}"),
        }
    }

    fn fmt_instruction(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: InstId,
        inst: &Instruction,
    ) -> fmt::Result {
        f.write_str("  ")?;
        if !inst.ty.is_void() {
            write!(f, "{} = ", self.value_name(&Value::Inst(id)))?;
        }
        let mnemonic = inst.kind.mnemonic();
        match &inst.kind {
            InstKind::Binary { lhs, rhs, .. } => {
                write!(f, "{mnemonic} {}, {}", self.typed_value(lhs), self.value_name(rhs))
            }
            InstKind::ICmp { pred, lhs, rhs } => write!(
                f,
                "{mnemonic} {pred} {}, {}",
                self.typed_value(lhs),
                self.value_name(rhs)
            ),
            InstKind::Alloca { allocated } => write!(f, "{mnemonic} {allocated}"),
            InstKind::Load { ptr } => {
                write!(f, "{mnemonic} {}, {}", inst.ty, self.typed_value(ptr))
            }
            InstKind::Store { value, ptr } => write!(
                f,
                "{mnemonic} {}, {}",
                self.typed_value(value),
                self.typed_value(ptr)
            ),
            InstKind::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|arg| self.typed_value(arg)).collect();
                write!(f, "{mnemonic} {} @{callee}({})", inst.ty, args.join(", "))
            }
            InstKind::Br { target } => write!(f, "{mnemonic} label {}", self.block_label(*target)),
            InstKind::CondBr {
                cond,
                then_block,
                else_block,
            } => write!(
                f,
                "{mnemonic} {}, label {}, label {}",
                self.typed_value(cond),
                self.block_label(*then_block),
                self.block_label(*else_block)
            ),
            InstKind::Ret { value: None } => write!(f, "{mnemonic} void"),
            InstKind::Ret { value: Some(value) } => {
                write!(f, "{mnemonic} {}", self.typed_value(value))
            }
            InstKind::Phi { incoming } => {
                let arms: Vec<String> = incoming
                    .iter()
                    .map(|(value, block)| {
                        format!("[ {}, {} ]", self.value_name(value), self.block_label(*block))
                    })
                    .collect();
                write!(f, "{mnemonic} {} {}", inst.ty, arms.join(", "))
            }
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_declaration() {
            let params: Vec<String> = self.params.iter().map(|p| p.ty.to_string()).collect();
            return writeln!(f, "declare {} @{}({})", self.ret, self.name, params.join(", "));
        }

        let params: Vec<String> = (0..self.params.len())
            .map(|index| self.typed_value(&Value::Param(ParamId::new(index))))
            .collect();
        writeln!(f, "define {} @{}({}) {{", self.ret, self.name, params.join(", "))?;
        for block in &self.blocks {
            writeln!(f, "{}:", block.name())?;
            for id in block.instructions() {
                if let Some(inst) = self.instruction(*id) {
                    self.fmt_instruction(f, *id, inst)?;
                    writeln!(f)?;
                }
            }
        }
        writeln!(f, "}}")
    }
}
