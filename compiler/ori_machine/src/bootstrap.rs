//! Generic fallback for the type-info type itself.
//!
//! Defines, all weakly, the descriptor of `std_util.type_info/0` and its
//! unify, index and compare entries. A value of that type is a type info,
//! so the entries compare their two register inputs structurally. Any
//! module that links a strong definition of one of these symbols replaces
//! the fallback.

use std::cmp::Ordering;

use ori_rtti::{compare_type_info, LayoutInfo, TypeCtorRep, TypeInfo};

use crate::code::{Continuation, EntryFn};
use crate::engine::Machine;
use crate::error::{LinkError, MachineFault};
use crate::linkage::{LinkageBuilder, Strength, TypeCtorDef};
use crate::module::RuntimeModule;
use crate::registers::{
    IndexResult, COMPARE_INPUT1, COMPARE_INPUT2, COMPARE_OUTPUT, INDEX_OUTPUT, UNIFY_INPUT1,
    UNIFY_INPUT2, UNIFY_OUTPUT,
};
use crate::symbol::SpecialPred;

pub const BOOTSTRAP_MODULE: RuntimeModule =
    RuntimeModule::new("std_util.bootstrap", register_bootstrap);

pub const TYPE_INFO_MODULE: &str = "std_util";
pub const TYPE_INFO_TYPE: &str = "type_info";

/// Descriptor of `std_util.type_info/0` as the fallback defines it.
pub fn type_info_def() -> TypeCtorDef {
    TypeCtorDef::new(TYPE_INFO_MODULE, TYPE_INFO_TYPE, 0, TypeCtorRep::TypeInfo)
        .with_layout(LayoutInfo::TypeInfoValue)
}

fn register_bootstrap(linkage: &mut LinkageBuilder) -> Result<(), LinkError> {
    let def = type_info_def();
    for pred in SpecialPred::ALL {
        let routine: EntryFn = match pred {
            SpecialPred::Unify => unify_entry,
            SpecialPred::Index => index_entry,
            SpecialPred::Compare => compare_entry,
        };
        linkage.define_entry(def.entry(pred).clone(), Strength::Weak, routine)?;
    }
    linkage.define_type_ctor(def, Strength::Weak)
}

/// Compare with the transient bank saved around the comparison.
fn compare_preserving(
    machine: &mut Machine,
    a: &TypeInfo,
    b: &TypeInfo,
) -> Result<Ordering, MachineFault> {
    let guard = machine.preserving_transients();
    Ok(compare_type_info(guard.descriptors(), a, b)?)
}

fn unify_entry(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    machine.check_registers(2)?;
    let a = machine.type_info_arg(UNIFY_INPUT1)?;
    let b = machine.type_info_arg(UNIFY_INPUT2)?;
    let equal = compare_preserving(machine, &a, &b)? == Ordering::Equal;
    machine.regs.set(UNIFY_OUTPUT, equal);
    machine.regs.set_success(equal);
    Ok(Continuation::Proceed)
}

fn index_entry(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    machine.regs.set(INDEX_OUTPUT, IndexResult::Unsupported);
    Ok(Continuation::Proceed)
}

fn compare_entry(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    machine.check_registers(2)?;
    let a = machine.type_info_arg(COMPARE_INPUT1)?;
    let b = machine.type_info_arg(COMPARE_INPUT2)?;
    let ord = compare_preserving(machine, &a, &b)?;
    machine.regs.set(COMPARE_OUTPUT, ord);
    Ok(Continuation::Proceed)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
mod tests;
