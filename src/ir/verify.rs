//! Structural verification of functions.
//!
//! [`verify`] checks the invariants every pass relies on and that the raw
//! [`Function::append_instruction`] primitive does not enforce by itself:
//!
//! - every block of a definition ends in exactly one terminator, and only there
//! - every arena instruction is linked into exactly the block it records
//! - every operand resolves to a live instruction, a parameter or a literal
//! - binary operators have integer operands of the result type
//! - the use-list index agrees with the operands

use std::collections::BTreeSet;

use crate::{
    ir::{Function, InstId, InstKind, IrType},
    Error, Result,
};

/// Verifies the structural invariants of `function`.
///
/// Declarations trivially verify.
///
/// # Errors
///
/// Returns [`Error::MissingTerminator`] for an unterminated block and
/// [`Error::Verification`] describing the first other violation found.
pub fn verify(function: &Function) -> Result<()> {
    let mut linked = BTreeSet::new();

    for block in function.blocks() {
        let Some(last) = block.last() else {
            return Err(Error::MissingTerminator(block.id()));
        };

        for &id in block.instructions() {
            let inst = function.instruction(id).ok_or_else(|| {
                Error::Verification(format!("{} lists erased instruction {id}", block.id()))
            })?;
            if inst.block() != block.id() {
                return Err(Error::Verification(format!(
                    "{id} is linked into {} but records {}",
                    block.id(),
                    inst.block()
                )));
            }
            if !linked.insert(id) {
                return Err(Error::Verification(format!("{id} is linked twice")));
            }
            if inst.is_terminator() && id != last {
                return Err(Error::Verification(format!(
                    "terminator {id} in the middle of {}",
                    block.id()
                )));
            }
            if !inst.is_terminator() && id == last {
                return Err(Error::MissingTerminator(block.id()));
            }
        }
    }

    for (id, slot) in function.arena() {
        let Some(inst) = slot else {
            if function.use_count(id) > 0 {
                return Err(Error::Verification(format!("erased {id} still has users")));
            }
            continue;
        };
        if !linked.contains(&id) {
            return Err(Error::Verification(format!("{id} is not linked into any block")));
        }

        for operand in inst.operands() {
            function.value_type(operand)?;
            if let Some(producer) = operand.as_inst() {
                if !function.users(producer).any(|user| user == id) {
                    return Err(Error::Verification(format!(
                        "use of {producer} by {id} is missing from the use-list"
                    )));
                }
            }
        }
        for target in inst.referenced_blocks() {
            if function.block(target).is_none() {
                return Err(Error::InvalidBlock(target));
            }
        }
        for user in function.users(id) {
            let reads = function
                .instruction(user)
                .is_some_and(|consumer| consumer.inst_operands().contains(&id));
            if !reads {
                return Err(Error::Verification(format!(
                    "use-list of {id} names {user}, which does not read it"
                )));
            }
        }

        verify_types(function, id, inst.kind(), inst.ty())?;
    }

    Ok(())
}

fn verify_types(function: &Function, id: InstId, kind: &InstKind, ty: &IrType) -> Result<()> {
    match kind {
        InstKind::Binary { lhs, rhs, .. } => {
            if !ty.is_int() {
                return Err(Error::Verification(format!(
                    "binary operator {id} produces non-integer {ty}"
                )));
            }
            for operand in [lhs, rhs] {
                let found = function.value_type(operand)?;
                if &found != ty {
                    return Err(Error::TypeMismatch {
                        expected: ty.clone(),
                        found,
                    });
                }
            }
        }
        InstKind::ICmp { lhs, rhs, .. } => {
            let lhs_ty = function.value_type(lhs)?;
            let rhs_ty = function.value_type(rhs)?;
            if !lhs_ty.is_int() || lhs_ty != rhs_ty || ty != &IrType::I1 {
                return Err(Error::Verification(format!(
                    "icmp {id} compares {lhs_ty} with {rhs_ty} into {ty}"
                )));
            }
        }
        InstKind::CondBr { cond, .. } => {
            let found = function.value_type(cond)?;
            if found != IrType::I1 {
                return Err(Error::TypeMismatch {
                    expected: IrType::I1,
                    found,
                });
            }
        }
        InstKind::Ret { value } => {
            let found = match value {
                Some(value) => function.value_type(value)?,
                None => IrType::Void,
            };
            if &found != function.return_type() {
                return Err(Error::TypeMismatch {
                    expected: function.return_type().clone(),
                    found,
                });
            }
        }
        InstKind::Alloca { .. }
        | InstKind::Load { .. }
        | InstKind::Store { .. }
        | InstKind::Call { .. }
        | InstKind::Br { .. }
        | InstKind::Phi { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOp, FunctionBuilder, FunctionType, Value};

    #[test]
    fn test_declaration_verifies() {
        let func = Function::new("decl", FunctionType::new(vec![IrType::I32], IrType::Void));
        assert!(verify(&func).is_ok());
    }

    #[test]
    fn test_built_function_verifies() {
        let mut func = Function::new("f", FunctionType::new(vec![IrType::I32], IrType::I32));
        let mut builder = FunctionBuilder::new(&mut func);
        let entry = builder.append_block("entry");
        builder.position_at_end(entry);
        let x = builder.arg(0).unwrap();
        let sum = builder.build_add(x, Value::i32(1), "").unwrap();
        builder.build_ret(Some(sum)).unwrap();

        assert!(verify(&func).is_ok());
    }

    #[test]
    fn test_missing_terminator() {
        let mut func = Function::new("f", FunctionType::new(vec![], IrType::Void));
        let entry = func.add_block("entry");
        assert!(matches!(verify(&func), Err(Error::MissingTerminator(_))));

        func.append_instruction(
            entry,
            InstKind::Binary {
                op: BinaryOp::Add,
                lhs: Value::i32(1),
                rhs: Value::i32(2),
            },
            IrType::I32,
            None,
        )
        .unwrap();
        assert!(matches!(verify(&func), Err(Error::MissingTerminator(_))));
    }

    #[test]
    fn test_terminator_in_middle() {
        let mut func = Function::new("f", FunctionType::new(vec![], IrType::Void));
        let entry = func.add_block("entry");
        func.append_instruction(entry, InstKind::Ret { value: None }, IrType::Void, None)
            .unwrap();
        func.append_instruction(entry, InstKind::Ret { value: None }, IrType::Void, None)
            .unwrap();
        assert!(matches!(verify(&func), Err(Error::Verification(_))));
    }

    #[test]
    fn test_binary_width_mismatch() {
        let mut func = Function::new("f", FunctionType::new(vec![], IrType::Void));
        let entry = func.add_block("entry");
        func.append_instruction(
            entry,
            InstKind::Binary {
                op: BinaryOp::Add,
                lhs: Value::i32(1),
                rhs: Value::i8(2),
            },
            IrType::I32,
            None,
        )
        .unwrap();
        func.append_instruction(entry, InstKind::Ret { value: None }, IrType::Void, None)
            .unwrap();
        assert!(matches!(
            verify(&func),
            Err(Error::TypeMismatch {
                found: IrType::Int(8),
                ..
            })
        ));
    }

    #[test]
    fn test_return_type_mismatch() {
        let mut func = Function::new("f", FunctionType::new(vec![], IrType::I32));
        let entry = func.add_block("entry");
        func.append_instruction(entry, InstKind::Ret { value: None }, IrType::Void, None)
            .unwrap();
        assert!(matches!(verify(&func), Err(Error::TypeMismatch { .. })));
    }
}
