//! Shared fixtures for unit tests: small runtime modules with specialized
//! operations, and runtimes linked from them.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "fixtures panic on unexpected state"
)]

use std::cmp::Ordering;

use ori_rtti::{FunctorDesc, FunctorsInfo, LayoutInfo, TypeCtorId, TypeCtorRep, TypeInfo};

use crate::bootstrap::type_info_def;
use crate::code::Continuation;
use crate::config::MachineConfig;
use crate::engine::Machine;
use crate::error::{LinkError, MachineFault};
use crate::generic::generic_compare;
use crate::linkage::{LinkageBuilder, Strength, TypeCtorDef};
use crate::module::RuntimeModule;
use crate::registers::{IndexResult, Reg, COMPARE_OUTPUT, INDEX_OUTPUT, UNIFY_OUTPUT};
use crate::runtime::{Runtime, DEFAULT_MODULES};
use crate::symbol::SpecialPred;

/// `builtin.int/0` with specialized unify and compare. Index is pointed at
/// the generic fallback.
pub const INT_MODULE: RuntimeModule = RuntimeModule::new("test.int", register_int);

/// `box.box/1`, whose compare recurses into the element type through
/// `generic_compare`.
pub const BOX_MODULE: RuntimeModule = RuntimeModule::new("test.box", register_box);

fn int_def() -> TypeCtorDef {
    let fallback_index = type_info_def().index;
    TypeCtorDef::new("builtin", "int", 0, TypeCtorRep::Int)
        .with_entry(SpecialPred::Index, fallback_index)
}

fn box_def() -> TypeCtorDef {
    TypeCtorDef::new("box", "box", 1, TypeCtorRep::NoTag)
        .with_functors(FunctorsInfo::Du([FunctorDesc::new("box", 1)].into()))
        .with_layout(LayoutInfo::Tagged)
}

fn register_int(linkage: &mut LinkageBuilder) -> Result<(), LinkError> {
    let def = int_def();
    linkage.define_entry(def.unify.clone(), Strength::Strong, unify_int)?;
    linkage.define_entry(def.compare.clone(), Strength::Strong, compare_int)?;
    linkage.define_type_ctor(def, Strength::Strong)
}

fn register_box(linkage: &mut LinkageBuilder) -> Result<(), LinkError> {
    let def = box_def();
    linkage.define_entry(def.unify.clone(), Strength::Strong, unify_box)?;
    linkage.define_entry(def.index.clone(), Strength::Strong, index_box)?;
    linkage.define_entry(def.compare.clone(), Strength::Strong, compare_box)?;
    linkage.define_type_ctor(def, Strength::Strong)
}

fn int_arg(machine: &Machine, reg: Reg) -> Result<i64, MachineFault> {
    let value = machine.regs.get(reg);
    value.as_int().ok_or(MachineFault::RegisterType {
        reg,
        expected: "int",
        found: value.kind(),
    })
}

fn unify_int(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    let equal = int_arg(machine, Reg::R1)? == int_arg(machine, Reg::R2)?;
    machine.regs.set(UNIFY_OUTPUT, equal);
    machine.regs.set_success(equal);
    Ok(Continuation::Proceed)
}

fn compare_int(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    let ord = int_arg(machine, Reg::R1)?.cmp(&int_arg(machine, Reg::R2)?);
    machine.regs.set(COMPARE_OUTPUT, ord);
    Ok(Continuation::Proceed)
}

/// `r1` = element type, `r2`, `r3` = unboxed values.
fn compare_box(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    let elem = machine.type_info_arg(Reg::R1)?;
    let x = machine.regs.get(Reg::R2).clone();
    let y = machine.regs.get(Reg::R3).clone();
    let ord = generic_compare(machine, &elem, x, y)?;
    machine.regs.set(COMPARE_OUTPUT, ord);
    Ok(Continuation::Proceed)
}

fn unify_box(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    compare_box(machine)?;
    let equal = machine.regs.get(COMPARE_OUTPUT).as_ordering() == Some(Ordering::Equal);
    machine.regs.set(UNIFY_OUTPUT, equal);
    machine.regs.set_success(equal);
    Ok(Continuation::Proceed)
}

fn index_box(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    machine.regs.set(INDEX_OUTPUT, IndexResult::At(0));
    Ok(Continuation::Proceed)
}

/// Default modules followed by `extra`, linked with `config`.
pub fn runtime_with(extra: &[RuntimeModule], config: MachineConfig) -> Runtime {
    let modules: Vec<RuntimeModule> = DEFAULT_MODULES.iter().chain(extra).copied().collect();
    Runtime::link(&modules, config).expect("test modules link")
}

/// Default modules plus the int and box fixtures, default configuration.
pub fn runtime() -> Runtime {
    runtime_with(&[INT_MODULE, BOX_MODULE], MachineConfig::default())
}

pub fn ctor(runtime: &Runtime, module_name: &str, type_name: &str, arity: u32) -> TypeCtorId {
    runtime
        .linkage()
        .descriptors()
        .lookup(module_name, type_name, arity)
        .expect("type constructor linked")
}

pub fn int_type(runtime: &Runtime) -> TypeInfo {
    TypeInfo::new(ctor(runtime, "builtin", "int", 0))
}

pub fn type_info_type(runtime: &Runtime) -> TypeInfo {
    TypeInfo::new(ctor(runtime, "std_util", "type_info", 0))
}

pub fn box_of(runtime: &Runtime, elem: TypeInfo) -> TypeInfo {
    TypeInfo::applied(ctor(runtime, "box", "box", 1), [elem])
}
