//! Shared factories for unit tests.

use crate::ir::{
    BinaryOp, CmpPredicate, Function, FunctionBuilder, FunctionType, InstKind, IrType, Module,
    Value,
};

/// `define i32 @single() { %r = <op> i32 lhs, rhs; ret i32 %r }`
pub fn single_op_function(op: BinaryOp, lhs: Value, rhs: Value) -> Function {
    let ty = match lhs.as_const() {
        Some(value) => IrType::Int(value.width()),
        None => IrType::I32,
    };
    let mut function = Function::new("single", FunctionType::new(vec![ty.clone()], ty));
    let mut builder = FunctionBuilder::new(&mut function);
    let entry = builder.append_block("entry");
    builder.position_at_end(entry);
    let result = builder.build_binary(op, lhs, rhs, "r").unwrap();
    builder.build_ret(Some(result)).unwrap();
    function
}

/// `t1 = add 2, 2; t2 = mul t1, 10; ret t2`
pub fn chain_function() -> Function {
    let mut function = Function::new("chain", FunctionType::new(vec![], IrType::I32));
    let mut builder = FunctionBuilder::new(&mut function);
    let entry = builder.append_block("entry");
    builder.position_at_end(entry);
    let t1 = builder.build_add(Value::i32(2), Value::i32(2), "t1").unwrap();
    let t2 = builder.build_mul(t1, Value::i32(10), "t2").unwrap();
    builder.build_ret(Some(t2)).unwrap();
    function
}

/// A counted loop whose body computes `i + (4 * 8)` and whose header compares against
/// `100 - 1`.
pub fn loop_function() -> Function {
    let mut function = Function::new("counted", FunctionType::new(vec![], IrType::I32));
    let mut builder = FunctionBuilder::new(&mut function);
    let entry = builder.append_block("entry");
    let header = builder.append_block("header");
    let body = builder.append_block("body");
    let exit = builder.append_block("exit");

    builder.position_at_end(entry);
    builder.build_br(header).unwrap();

    builder.position_at_end(header);
    let phi = builder.build_phi(IrType::I32, vec![(Value::i32(0), entry)], "i").unwrap();
    let limit = builder.build_sub(Value::i32(100), Value::i32(1), "limit").unwrap();
    let done = builder
        .build_icmp(CmpPredicate::Sgt, phi.clone(), limit, "done")
        .unwrap();
    builder.build_cond_br(done, exit, body).unwrap();

    builder.position_at_end(body);
    let step = builder.build_mul(Value::i32(4), Value::i32(8), "step").unwrap();
    let next = builder.build_add(phi.clone(), step, "next").unwrap();
    builder.build_br(header).unwrap();

    builder.position_at_end(exit);
    builder.build_ret(Some(phi.clone())).unwrap();

    // Close the loop now that `next` exists
    let phi = phi.as_inst().unwrap();
    function.add_phi_incoming(phi, next, body).unwrap();
    function
}

/// The module produced by the classic "build a module" walkthrough: `foo` spills its
/// arguments to stack slots, adds them, compares against 255 and calls `bar`/`baz`.
/// Nothing in it has two literal operands, so it contains nothing to fold.
pub fn walkthrough_module() -> Module {
    let mut module = Module::new("walkthrough");
    let bar = module
        .get_or_insert_function("bar", FunctionType::new(vec![IrType::I32], IrType::Void))
        .unwrap();
    let baz = module
        .get_or_insert_function("baz", FunctionType::new(vec![], IrType::I32))
        .unwrap();
    let foo = module
        .get_or_insert_function(
            "foo",
            FunctionType::new(vec![IrType::I32, IrType::I32], IrType::Void),
        )
        .unwrap();

    let function = module.function_mut(&foo.name).unwrap();
    let mut builder = FunctionBuilder::new(function);
    let entry = builder.append_block("bb");
    let matched = builder.append_block("matched");
    let join = builder.append_block("join");
    let a = builder.arg(0).unwrap();
    let b = builder.arg(1).unwrap();

    builder.position_at_end(entry);
    let a_slot = builder.build_alloca(IrType::I32, "a.addr").unwrap();
    let b_slot = builder.build_alloca(IrType::I32, "b.addr").unwrap();
    let sum_slot = builder.build_alloca(IrType::I32, "sum.addr").unwrap();
    builder.build_store(a, a_slot.clone()).unwrap();
    builder.build_store(b, b_slot.clone()).unwrap();
    let a_val = builder.build_load(IrType::I32, a_slot, "a.val").unwrap();
    let b_val = builder.build_load(IrType::I32, b_slot, "b.val").unwrap();
    let sum = builder.build_add(a_val, b_val, "sum").unwrap();
    builder.build_store(sum, sum_slot.clone()).unwrap();
    let loaded = builder.build_load(IrType::I32, sum_slot.clone(), "loaded").unwrap();
    let is_max = builder
        .build_icmp(CmpPredicate::Eq, loaded, Value::i32(255), "is.max")
        .unwrap();
    builder.build_cond_br(is_max, matched, join).unwrap();

    builder.position_at_end(matched);
    let reloaded = builder.build_load(IrType::I32, sum_slot.clone(), "reloaded").unwrap();
    builder.build_call(&bar, vec![reloaded], "").unwrap();
    let fresh = builder.build_call(&baz, vec![], "fresh").unwrap();
    builder.build_store(fresh, sum_slot.clone()).unwrap();
    builder.build_br(join).unwrap();

    builder.position_at_end(join);
    let result = builder.build_load(IrType::I32, sum_slot, "result").unwrap();
    builder.build_call(&bar, vec![result], "").unwrap();
    builder.build_ret(None).unwrap();

    module
}

/// Value returned by the first `ret` of `function`.
pub fn returned_value(function: &Function) -> Option<Value> {
    function.instructions().find_map(|(_, inst)| match inst.kind() {
        InstKind::Ret { value } => value.clone(),
        _ => None,
    })
}
