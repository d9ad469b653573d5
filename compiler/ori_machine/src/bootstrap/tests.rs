use std::cmp::Ordering;

use pretty_assertions::assert_eq;

use ori_rtti::{ConsistencyError, FunctorsInfo, LayoutInfo, TypeCtorId, TypeCtorRep, TypeInfo};

use super::type_info_def;
use crate::code::Continuation;
use crate::config::MachineConfig;
use crate::engine::Machine;
use crate::error::{LinkError, MachineFault};
use crate::linkage::{LinkageBuilder, Strength, TypeCtorDef};
use crate::module::RuntimeModule;
use crate::registers::{IndexResult, Reg, Value};
use crate::symbol::SpecialPred;
use crate::test_helpers::{ctor, int_type, runtime, runtime_with, type_info_type, INT_MODULE};

/// `mod.ctor/0`, `mod.ctor1/0` and `mod.ctor2/0`, every operation routed to
/// the fallback.
const MOD_MODULE: RuntimeModule = RuntimeModule::new("mod", register_mod);

fn register_mod(linkage: &mut LinkageBuilder) -> Result<(), LinkError> {
    let fallback = type_info_def();
    for name in ["ctor", "ctor1", "ctor2"] {
        let mut def = TypeCtorDef::new("mod", name, 0, TypeCtorRep::Enum);
        for pred in SpecialPred::ALL {
            def = def.with_entry(pred, fallback.entry(pred).clone());
        }
        linkage.define_type_ctor(def, Strength::Weak)?;
    }
    Ok(())
}

const REVERSED_MODULE: RuntimeModule = RuntimeModule::new("reversed", register_reversed);

fn register_reversed(linkage: &mut LinkageBuilder) -> Result<(), LinkError> {
    linkage.define_entry(type_info_def().compare, Strength::Strong, always_greater)
}

fn always_greater(machine: &mut Machine) -> Result<Continuation, MachineFault> {
    machine.regs.set(Reg::R1, Ordering::Greater);
    Ok(Continuation::Proceed)
}

fn call(machine: &mut Machine, pred: SpecialPred, a: TypeInfo, b: TypeInfo) -> Value {
    machine.regs.set(Reg::R1, a);
    machine.regs.set(Reg::R2, b);
    let symbol = type_info_def().entry(pred).clone();
    machine.call_symbol(symbol.as_str()).unwrap();
    machine.regs.get(Reg::R1).clone()
}

fn mod_machine() -> Machine {
    runtime_with(&[MOD_MODULE], MachineConfig::default()).machine()
}

#[test]
fn type_info_descriptor_is_linked() {
    let runtime = runtime();
    let id = ctor(&runtime, "std_util", "type_info", 0);
    let info = runtime.linkage().descriptors().get(id).unwrap();
    assert_eq!(info.arity, 0);
    assert_eq!(info.rep, TypeCtorRep::TypeInfo);
    assert_eq!(info.functors, FunctorsInfo::Special);
    assert_eq!(info.layout, LayoutInfo::TypeInfoValue);

    let def = type_info_def();
    assert_eq!(Some(info.unify_entry), runtime.linkage().entry(def.unify.as_str()));
    assert_eq!(Some(info.index_entry), runtime.linkage().entry(def.index.as_str()));
    assert_eq!(Some(info.compare_entry), runtime.linkage().entry(def.compare.as_str()));
    assert_eq!(
        runtime.linkage().type_ctor("type_ctor_info_std_util__type_info_0"),
        Some(id)
    );
}

#[test]
fn same_ctor_twice() {
    let mut machine = mod_machine();
    let id = ctor(machine.runtime(), "mod", "ctor", 0);

    let ord = call(&mut machine, SpecialPred::Compare, TypeInfo::new(id), TypeInfo::new(id));
    assert_eq!(ord, Value::Ordering(Ordering::Equal));

    let unified = call(&mut machine, SpecialPred::Unify, TypeInfo::new(id), TypeInfo::new(id));
    assert_eq!(unified, Value::Bool(true));
    assert!(machine.regs.success());

    let index = call(&mut machine, SpecialPred::Index, TypeInfo::new(id), TypeInfo::new(id));
    assert_eq!(index, Value::Index(IndexResult::Unsupported));
    assert_eq!(IndexResult::Unsupported.to_raw(), -1);
}

#[test]
fn ctor1_before_ctor2_every_time() {
    let mut machine = mod_machine();
    let ctor1 = TypeInfo::new(ctor(machine.runtime(), "mod", "ctor1", 0));
    let ctor2 = TypeInfo::new(ctor(machine.runtime(), "mod", "ctor2", 0));

    for _ in 0..3 {
        let ord = call(&mut machine, SpecialPred::Compare, ctor1.clone(), ctor2.clone());
        assert_eq!(ord, Value::Ordering(Ordering::Less));
    }
    let ord = call(&mut machine, SpecialPred::Compare, ctor2.clone(), ctor1.clone());
    assert_eq!(ord, Value::Ordering(Ordering::Greater));

    let unified = call(&mut machine, SpecialPred::Unify, ctor1, ctor2);
    assert_eq!(unified, Value::Bool(false));
    assert!(!machine.regs.success());
}

#[test]
fn index_ignores_its_input() {
    let mut machine = runtime().machine();
    machine.regs.set(Reg::R1, 42_i64);
    machine.call_symbol(type_info_def().index.as_str()).unwrap();
    assert_eq!(machine.regs.get(Reg::R1), &Value::Index(IndexResult::Unsupported));
}

#[test]
fn non_type_info_input_faults() {
    let mut machine = runtime().machine();
    machine.regs.set(Reg::R1, 1_i64);
    machine.regs.set(Reg::R2, 2_i64);
    let err = machine.call_symbol(type_info_def().compare.as_str());
    assert_eq!(
        err,
        Err(MachineFault::RegisterType {
            reg: Reg::R1,
            expected: "type_info",
            found: "int",
        })
    );
}

#[test]
fn unregistered_ctor_is_a_consistency_fault() {
    let mut machine = runtime().machine();
    let stray = TypeCtorId::from_raw(999);
    machine.regs.set(Reg::R1, TypeInfo::new(stray));
    machine.regs.set(Reg::R2, int_type(machine.runtime()));
    let err = machine.call_symbol(type_info_def().compare.as_str());
    assert_eq!(
        err,
        Err(MachineFault::Consistency(ConsistencyError::UnregisteredTypeCtor(stray)))
    );
}

#[test]
fn compare_writes_only_r1() {
    let mut machine = runtime().machine();
    let int = int_type(machine.runtime());
    machine.regs.set(Reg::R1, int.clone());
    machine.regs.set(Reg::R2, int.clone());
    for n in 3..=8 {
        machine.regs.set(Reg::new(n), i64::from(n) * 10);
    }

    machine.call_symbol(type_info_def().compare.as_str()).unwrap();

    assert_eq!(machine.regs.get(Reg::R1), &Value::Ordering(Ordering::Equal));
    assert_eq!(machine.regs.get(Reg::R2), &Value::TypeInfo(int));
    for n in 3..=8 {
        assert_eq!(machine.regs.get(Reg::new(n)), &Value::Int(i64::from(n) * 10));
    }
}

#[test]
fn one_register_machine_overflows() {
    let config = MachineConfig::default()
        .with_transient_registers(1)
        .with_total_registers(1);
    let runtime = runtime_with(&[], config);
    let mut machine = runtime.machine();
    let def = type_info_def();
    for symbol in [&def.compare, &def.unify] {
        machine.regs.set(Reg::R1, type_info_type(&runtime));
        assert_eq!(
            machine.call_symbol(symbol.as_str()),
            Err(MachineFault::RegisterOverflow {
                needed: 2,
                available: 1,
            })
        );
    }
    // Index reads nothing and still answers.
    machine.call_symbol(def.index.as_str()).unwrap();
    assert_eq!(machine.regs.get(Reg::R1), &Value::Index(IndexResult::Unsupported));
}

#[test]
fn strong_compare_overrides_fallback() {
    let runtime = runtime_with(&[INT_MODULE, REVERSED_MODULE], MachineConfig::default());
    let mut machine = runtime.machine();
    let int = int_type(&runtime);

    let ord = call(&mut machine, SpecialPred::Compare, int.clone(), int.clone());
    assert_eq!(ord, Value::Ordering(Ordering::Greater));

    // The descriptor points at the override; unify is still the fallback.
    let id = ctor(&runtime, "std_util", "type_info", 0);
    let info = runtime.linkage().descriptors().get(id).unwrap();
    let label = runtime.linkage().label(info.compare_entry).unwrap();
    assert_eq!(label, &type_info_def().compare);
    let routine = runtime.linkage().routine(info.compare_entry).unwrap();
    assert_eq!(routine as usize, always_greater as usize);

    let unified = call(&mut machine, SpecialPred::Unify, int.clone(), int);
    assert_eq!(unified, Value::Bool(true));
}
