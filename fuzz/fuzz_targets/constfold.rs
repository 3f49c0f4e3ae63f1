#![no_main]

use libfuzzer_sys::fuzz_target;
use ssafold::ir::{verify, ApInt, BinaryOp, Function, FunctionBuilder, FunctionType, IrType, Value};
use ssafold::ConstantFoldingPass;
use strum::IntoEnumIterator;

// Byte layout: width, then (opcode, lhs, rhs) triples. Operand bytes below 0x40 pick an
// earlier result or the parameter, anything else is a literal.
fn build(data: &[u8]) -> Option<Function> {
    let (&width, body) = data.split_first()?;
    let width = u32::from(width % 64) + 1;
    let ty = IrType::int(width).ok()?;
    let ops: Vec<BinaryOp> = BinaryOp::iter().collect();

    let mut function = Function::new("fuzz", FunctionType::new(vec![ty.clone()], ty));
    let mut builder = FunctionBuilder::new(&mut function);
    let entry = builder.append_block("entry");
    builder.position_at_end(entry);

    let mut values = vec![builder.arg(0)?];
    for chunk in body.chunks_exact(3) {
        let operand = |byte: u8, values: &[Value]| -> Option<Value> {
            if byte < 0x40 {
                return values.get(usize::from(byte) % values.len()).cloned();
            }
            ApInt::from_u64(width, u64::from(byte)).ok().map(Value::Const)
        };
        let op = ops[usize::from(chunk[0]) % ops.len()];
        let lhs = operand(chunk[1], &values)?;
        let rhs = operand(chunk[2], &values)?;
        values.push(builder.build_binary(op, lhs, rhs, "").ok()?);
    }
    let last = values.last().cloned();
    builder.build_ret(last).ok()?;
    Some(function)
}

fuzz_target!(|data: &[u8]| {
    let Some(mut function) = build(data) else {
        return;
    };
    let pass = ConstantFoldingPass::new();
    let stats = pass.run_with_stats(&mut function);

    assert!(stats.converged);
    assert!(verify(&function).is_ok());
    assert!(!pass.run(&mut function));
});
