//! Polymorphic dispatch through type infos.
//!
//! `builtin.unify/2`, `builtin.compare/3` and `builtin.index/2` take a type
//! info in `r1` followed by the values. They resolve the type info's
//! descriptor, load the argument type infos into `r1..=rK`, shift the values
//! down after them and tail-jump to the descriptor's operation. A variable
//! arity constructor (tuple, pred, func) has no fixed `K`, so its operation
//! gets `K` itself in `r1` and the type infos from `r2`:
//!
//! ```text
//! builtin.compare(T, x, y)       r1 = T, r2 = x, r3 = y
//!   T = list(int)            =>  r1 = int, r2 = x, r3 = y, jump compare_entry
//!   T = type_info            =>  r1 = x, r2 = y, jump compare_entry
//!   T = {int, string}        =>  r1 = 2, r2 = int, r3 = string,
//!                                r4 = x, r5 = y, jump compare_entry
//! ```
//!
//! The `generic_*` functions do the same from Rust, by a nested
//! `call_engine` that leaves the caller's transient registers untouched.

use std::cmp::Ordering;

use ori_rtti::{CodeAddr, ConsistencyError, TypeInfo};
use smallvec::SmallVec;

use crate::code::Continuation;
use crate::engine::Machine;
use crate::error::{LinkError, MachineFault};
use crate::linkage::{LinkageBuilder, Strength};
use crate::module::RuntimeModule;
use crate::registers::{IndexResult, Reg, Value, COMPARE_OUTPUT, INDEX_OUTPUT, UNIFY_OUTPUT};
use crate::symbol::{SpecialPred, Symbol};

pub const BUILTIN_MODULE: RuntimeModule = RuntimeModule::new("builtin", register_builtin);

pub const BUILTIN_UNIFY: &str = "builtin__unify_2_0";
pub const BUILTIN_COMPARE: &str = "builtin__compare_3_0";
pub const BUILTIN_INDEX: &str = "builtin__index_2_0";

fn register_builtin(linkage: &mut LinkageBuilder) -> Result<(), LinkError> {
    linkage.define_entry(Symbol::new(BUILTIN_UNIFY), Strength::Strong, builtin_unify)?;
    linkage.define_entry(Symbol::new(BUILTIN_COMPARE), Strength::Strong, builtin_compare)?;
    linkage.define_entry(Symbol::new(BUILTIN_INDEX), Strength::Strong, builtin_index)
}

fn builtin_unify(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    dispatch(machine, SpecialPred::Unify, 2)
}

fn builtin_compare(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    dispatch(machine, SpecialPred::Compare, 2)
}

fn builtin_index(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    dispatch(machine, SpecialPred::Index, 1)
}

/// Rearrange `r1 = T, r2.. = values` for `T`'s `pred` and jump to it.
fn dispatch(
    machine: &mut Machine,
    pred: SpecialPred,
    values: usize,
) -> Result<Continuation, MachineFault> {
    let info = machine.type_info_arg(Reg::R1)?;
    let (target, variadic) = operation_entry(machine, &info, pred)?;

    let arity = info.arity();
    let first_arg = if variadic { 2 } else { 1 };
    machine.check_registers((first_arg - 1 + arity + values).max(values + 1))?;

    let mut moved: SmallVec<[Value; 2]> = SmallVec::with_capacity(values);
    for n in 2..=values + 1 {
        moved.push(machine.regs.take(register(n)?));
    }
    if variadic {
        let count = i64::try_from(arity).map_err(|_| MachineFault::RegisterOverflow {
            needed: arity,
            available: machine.regs.len(),
        })?;
        machine.regs.set(Reg::R1, count);
    }
    for (n, arg) in (first_arg..).zip(info.args()) {
        machine.regs.set(register(n)?, arg.clone());
    }
    for (n, value) in (first_arg + arity..).zip(moved) {
        machine.regs.set(register(n)?, value);
    }

    tracing::trace!(%pred, arity, variadic, %target, "dispatching");
    Ok(Continuation::Jump(target))
}

/// `pred`'s entry for the descriptor of `info`, and whether that descriptor
/// has variable arity.
fn operation_entry(
    machine: &Machine,
    info: &TypeInfo,
    pred: SpecialPred,
) -> Result<(CodeAddr, bool), MachineFault> {
    let ctor = machine.descriptors().resolve(info.ctor())?;
    if !ctor.accepts_arity(info.arity()) {
        return Err(ConsistencyError::ArityMismatch {
            ctor: ctor.key(),
            expected: ctor.arity,
            found: info.arity(),
        }
        .into());
    }
    let entry = match pred {
        SpecialPred::Unify => ctor.unify_entry,
        SpecialPred::Index => ctor.index_entry,
        SpecialPred::Compare => ctor.compare_entry,
    };
    Ok((entry, ctor.is_variable_arity()))
}

fn register(n: usize) -> Result<Reg, MachineFault> {
    u16::try_from(n)
        .map(Reg::new)
        .map_err(|_| MachineFault::RegisterOverflow {
            needed: n,
            available: usize::from(u16::MAX),
        })
}

/// Compare `x` and `y` at type `info`.
pub fn generic_compare(
    machine: &mut Machine,
    info: &TypeInfo,
    x: impl Into<Value>,
    y: impl Into<Value>,
) -> Result<Ordering, MachineFault> {
    let (x, y) = (x.into(), y.into());
    call_builtin(machine, BUILTIN_COMPARE, info, [x, y], |m| {
        read_output(m, COMPARE_OUTPUT, "ordering", Value::as_ordering)
    })
}

/// Unify `x` and `y` at type `info`.
pub fn generic_unify(
    machine: &mut Machine,
    info: &TypeInfo,
    x: impl Into<Value>,
    y: impl Into<Value>,
) -> Result<bool, MachineFault> {
    let (x, y) = (x.into(), y.into());
    call_builtin(machine, BUILTIN_UNIFY, info, [x, y], |m| {
        read_output(m, UNIFY_OUTPUT, "bool", Value::as_bool)
    })
}

/// Index `x` at type `info`.
pub fn generic_index(
    machine: &mut Machine,
    info: &TypeInfo,
    x: impl Into<Value>,
) -> Result<IndexResult, MachineFault> {
    call_builtin(machine, BUILTIN_INDEX, info, [x.into()], |m| {
        read_output(m, INDEX_OUTPUT, "index", Value::as_index)
    })
}

fn call_builtin<const N: usize, T>(
    machine: &mut Machine,
    symbol: &str,
    info: &TypeInfo,
    values: [Value; N],
    output: impl FnOnce(&Machine) -> Result<T, MachineFault>,
) -> Result<T, MachineFault> {
    let entry = machine.linkage().require_entry(symbol)?;
    machine.check_registers(N + 1)?;
    machine.with_preserved_transients(|m| {
        m.regs.set(Reg::R1, info.clone());
        for (n, value) in (2..).zip(values) {
            m.regs.set(register(n)?, value);
        }
        m.call_engine(entry)?;
        output(m)
    })
}

fn read_output<T>(
    machine: &Machine,
    reg: Reg,
    expected: &'static str,
    read: impl FnOnce(&Value) -> Option<T>,
) -> Result<T, MachineFault> {
    let value = machine.regs.get(reg);
    read(value).ok_or(MachineFault::RegisterType {
        reg,
        expected,
        found: value.kind(),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
