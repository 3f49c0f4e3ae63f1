//! Insertion-point builder for function bodies.
//!
//! [`FunctionBuilder`] wraps [`Function::append_instruction`] with the typing rules of
//! each opcode and with terminator placement: once a block ends in a branch or return,
//! nothing more can be appended to it.
//!
//! # Examples
//!
//! ```rust
//! use ssafold::ir::{Function, FunctionBuilder, FunctionType, IrType, Value};
//!
//! let mut function = Function::new("f", FunctionType::new(vec![IrType::I32], IrType::I32));
//! let mut builder = FunctionBuilder::new(&mut function);
//! let entry = builder.append_block("entry");
//! builder.position_at_end(entry);
//!
//! let x = builder.arg(0).unwrap();
//! let sum = builder.build_add(x, Value::i32(1), "sum")?;
//! builder.build_ret(Some(sum))?;
//! # Ok::<(), ssafold::Error>(())
//! ```

use crate::{
    ir::{
        BinaryOp, BlockId, CmpPredicate, Function, FunctionType, InstId, InstKind, IrType, Value,
    },
    Error, Result,
};

/// A callable symbol: name plus signature, as returned by
/// [`crate::ir::Module::get_or_insert_function`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callee {
    /// Symbol name.
    pub name: String,
    /// Signature used to type-check call sites.
    pub ty: FunctionType,
}

/// Appends type-checked instructions at the end of a chosen block.
pub struct FunctionBuilder<'f> {
    function: &'f mut Function,
    block: Option<BlockId>,
}

fn optional_name(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}

impl<'f> FunctionBuilder<'f> {
    /// Creates a builder without an insertion point.
    pub fn new(function: &'f mut Function) -> Self {
        FunctionBuilder {
            function,
            block: None,
        }
    }

    /// The function being built.
    #[must_use]
    pub fn function(&self) -> &Function {
        self.function
    }

    /// Parameter `index` as an operand.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<Value> {
        self.function.arg(index)
    }

    /// Adds a new block to the function without moving the insertion point.
    pub fn append_block(&mut self, name: impl Into<String>) -> BlockId {
        self.function.add_block(name)
    }

    /// Moves the insertion point to the end of `block`.
    pub fn position_at_end(&mut self, block: BlockId) {
        self.block = Some(block);
    }

    /// The block instructions are currently appended to.
    #[must_use]
    pub fn insertion_block(&self) -> Option<BlockId> {
        self.block
    }

    fn insert(&mut self, kind: InstKind, ty: IrType, name: &str) -> Result<InstId> {
        let block = self.block.ok_or(Error::NoInsertionPoint)?;
        let terminated = self
            .function
            .block(block)
            .ok_or(Error::InvalidBlock(block))?
            .last()
            .and_then(|id| self.function.instruction(id))
            .is_some_and(|inst| inst.is_terminator());
        if terminated {
            return Err(Error::BlockTerminated(block));
        }
        self.function
            .append_instruction(block, kind, ty, optional_name(name))
    }

    fn expect_type(&self, value: &Value, expected: &IrType) -> Result<()> {
        let found = self.function.value_type(value)?;
        if &found != expected {
            return Err(Error::TypeMismatch {
                expected: expected.clone(),
                found,
            });
        }
        Ok(())
    }

    fn int_type(&self, value: &Value) -> Result<IrType> {
        let ty = self.function.value_type(value)?;
        if !ty.is_int() {
            return Err(Error::TypeMismatch {
                expected: IrType::I32,
                found: ty,
            });
        }
        Ok(ty)
    }

    /// Appends `lhs op rhs`; both operands must share one integer type.
    ///
    /// An empty `name` leaves the result unnamed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for non-integer or mismatched operands, and the
    /// insertion errors listed on [`FunctionBuilder::build_ret`].
    pub fn build_binary(
        &mut self,
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
        name: &str,
    ) -> Result<Value> {
        let ty = self.int_type(&lhs)?;
        self.expect_type(&rhs, &ty)?;
        let id = self.insert(InstKind::Binary { op, lhs, rhs }, ty, name)?;
        Ok(Value::Inst(id))
    }

    /// Appends an `add`.
    ///
    /// # Errors
    ///
    /// See [`FunctionBuilder::build_binary`].
    pub fn build_add(&mut self, lhs: Value, rhs: Value, name: &str) -> Result<Value> {
        self.build_binary(BinaryOp::Add, lhs, rhs, name)
    }

    /// Appends a `sub`.
    ///
    /// # Errors
    ///
    /// See [`FunctionBuilder::build_binary`].
    pub fn build_sub(&mut self, lhs: Value, rhs: Value, name: &str) -> Result<Value> {
        self.build_binary(BinaryOp::Sub, lhs, rhs, name)
    }

    /// Appends a `mul`.
    ///
    /// # Errors
    ///
    /// See [`FunctionBuilder::build_binary`].
    pub fn build_mul(&mut self, lhs: Value, rhs: Value, name: &str) -> Result<Value> {
        self.build_binary(BinaryOp::Mul, lhs, rhs, name)
    }

    /// Appends an `sdiv`.
    ///
    /// # Errors
    ///
    /// See [`FunctionBuilder::build_binary`].
    pub fn build_sdiv(&mut self, lhs: Value, rhs: Value, name: &str) -> Result<Value> {
        self.build_binary(BinaryOp::SDiv, lhs, rhs, name)
    }

    /// Appends a bitwise `and`.
    ///
    /// # Errors
    ///
    /// See [`FunctionBuilder::build_binary`].
    pub fn build_and(&mut self, lhs: Value, rhs: Value, name: &str) -> Result<Value> {
        self.build_binary(BinaryOp::And, lhs, rhs, name)
    }

    /// Appends a bitwise `or`.
    ///
    /// # Errors
    ///
    /// See [`FunctionBuilder::build_binary`].
    pub fn build_or(&mut self, lhs: Value, rhs: Value, name: &str) -> Result<Value> {
        self.build_binary(BinaryOp::Or, lhs, rhs, name)
    }

    /// Appends a bitwise `xor`.
    ///
    /// # Errors
    ///
    /// See [`FunctionBuilder::build_binary`].
    pub fn build_xor(&mut self, lhs: Value, rhs: Value, name: &str) -> Result<Value> {
        self.build_binary(BinaryOp::Xor, lhs, rhs, name)
    }

    /// Appends an integer comparison producing an `i1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for non-integer or mismatched operands.
    pub fn build_icmp(
        &mut self,
        pred: CmpPredicate,
        lhs: Value,
        rhs: Value,
        name: &str,
    ) -> Result<Value> {
        let ty = self.int_type(&lhs)?;
        self.expect_type(&rhs, &ty)?;
        let id = self.insert(InstKind::ICmp { pred, lhs, rhs }, IrType::I1, name)?;
        Ok(Value::Inst(id))
    }

    /// Appends a stack slot for one `allocated` value, yielding a pointer.
    ///
    /// # Errors
    ///
    /// Returns an insertion error if the builder is not positioned in an open block.
    pub fn build_alloca(&mut self, allocated: IrType, name: &str) -> Result<Value> {
        let id = self.insert(InstKind::Alloca { allocated }, IrType::Ptr, name)?;
        Ok(Value::Inst(id))
    }

    /// Appends a load of type `ty` from `ptr`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `ptr` is not a pointer.
    pub fn build_load(&mut self, ty: IrType, ptr: Value, name: &str) -> Result<Value> {
        self.expect_type(&ptr, &IrType::Ptr)?;
        let id = self.insert(InstKind::Load { ptr }, ty, name)?;
        Ok(Value::Inst(id))
    }

    /// Appends a store of `value` to `ptr`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `ptr` is not a pointer.
    pub fn build_store(&mut self, value: Value, ptr: Value) -> Result<InstId> {
        self.expect_type(&ptr, &IrType::Ptr)?;
        self.function.value_type(&value)?;
        self.insert(InstKind::Store { value, ptr }, IrType::Void, "")
    }

    /// Appends a direct call; the result is a `void` value for procedures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Verification`] on an argument count mismatch and
    /// [`Error::TypeMismatch`] on an argument type mismatch.
    pub fn build_call(&mut self, callee: &Callee, args: Vec<Value>, name: &str) -> Result<Value> {
        if args.len() != callee.ty.params.len() {
            return Err(Error::Verification(format!(
                "call to @{} passes {} arguments, expected {}",
                callee.name,
                args.len(),
                callee.ty.params.len()
            )));
        }
        for (arg, expected) in args.iter().zip(&callee.ty.params) {
            self.expect_type(arg, expected)?;
        }
        let id = self.insert(
            InstKind::Call {
                callee: callee.name.clone(),
                args,
            },
            callee.ty.ret.clone(),
            name,
        )?;
        Ok(Value::Inst(id))
    }

    /// Appends an unconditional branch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] for an unknown target.
    pub fn build_br(&mut self, target: BlockId) -> Result<InstId> {
        self.insert(InstKind::Br { target }, IrType::Void, "")
    }

    /// Appends a conditional branch on an `i1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `cond` is not an `i1`.
    pub fn build_cond_br(
        &mut self,
        cond: Value,
        then_block: BlockId,
        else_block: BlockId,
    ) -> Result<InstId> {
        self.expect_type(&cond, &IrType::I1)?;
        self.insert(
            InstKind::CondBr {
                cond,
                then_block,
                else_block,
            },
            IrType::Void,
            "",
        )
    }

    /// Appends a return; `None` returns `void`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value does not match the return type,
    /// [`Error::NoInsertionPoint`] if the builder is not positioned and
    /// [`Error::BlockTerminated`] if the block already ends in a terminator.
    pub fn build_ret(&mut self, value: Option<Value>) -> Result<InstId> {
        let expected = self.function.return_type().clone();
        match &value {
            Some(value) => self.expect_type(value, &expected)?,
            None if !expected.is_void() => {
                return Err(Error::TypeMismatch {
                    expected,
                    found: IrType::Void,
                })
            }
            None => {}
        }
        self.insert(InstKind::Ret { value }, IrType::Void, "")
    }

    /// Appends a phi merging one value per predecessor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if an incoming value is not of type `ty`.
    pub fn build_phi(
        &mut self,
        ty: IrType,
        incoming: Vec<(Value, BlockId)>,
        name: &str,
    ) -> Result<Value> {
        for (value, _) in &incoming {
            self.expect_type(value, &ty)?;
        }
        let id = self.insert(InstKind::Phi { incoming }, ty, name)?;
        Ok(Value::Inst(id))
    }
}
