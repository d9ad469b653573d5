//! The Ori abstract machine: registers, linkage and the generic fallback
//! layer.
//!
//! Generated code calls unify, compare and index through well-known symbols.
//! Where the compiler emitted a specialization for a type, that definition is
//! strong and wins at link time; everywhere else the weak generic fallback
//! from [`bootstrap`] answers, comparing type descriptors structurally.
//!
//! # Usage
//!
//! ```text
//! let runtime = init_runtime(DEFAULT_MODULES)?;
//! let mut machine = runtime.machine();
//! machine.regs.set(Reg::R1, type_info);
//! machine.regs.set(Reg::R2, x);
//! machine.regs.set(Reg::R3, y);
//! machine.call_symbol(BUILTIN_COMPARE)?;
//! let ord = machine.regs.get(COMPARE_OUTPUT);
//! ```
//!
//! # Tracing
//!
//! Call [`init_tracing`] early; with `RUST_LOG` set (for example
//! `RUST_LOG=ori_machine=debug`) link decisions and machine faults are
//! logged. Hosts with their own subscriber skip it.

pub mod bootstrap;
mod code;
mod config;
mod engine;
mod error;
pub mod generic;
mod linkage;
mod module;
mod registers;
mod runtime;
mod symbol;

#[cfg(test)]
mod test_helpers;

use std::sync::OnceLock;

pub use code::{CodeEntry, CodeTable, Continuation, EntryFn};
pub use config::MachineConfig;
pub use engine::{Machine, PreservedTransients};
pub use error::{LinkError, MachineFault};
pub use generic::{
    generic_compare, generic_index, generic_unify, BUILTIN_COMPARE, BUILTIN_INDEX, BUILTIN_UNIFY,
};
pub use linkage::{Linkage, LinkageBuilder, Strength, TypeCtorDef};
pub use module::{link_modules, ModuleInit, RuntimeModule};
pub use registers::{
    IndexResult, Reg, RegisterFile, TransientSnapshot, Value, COMPARE_INPUT1, COMPARE_INPUT2,
    COMPARE_OUTPUT, INDEX_INPUT, INDEX_OUTPUT, UNIFY_INPUT1, UNIFY_INPUT2, UNIFY_OUTPUT,
};
pub use runtime::{global_runtime, init_runtime, Runtime, DEFAULT_MODULES};
pub use symbol::{proc_entry, special_pred, type_ctor_info, SpecialPred, Symbol};

static TRACING: OnceLock<bool> = OnceLock::new();

/// Install a fmt subscriber filtered by `RUST_LOG`.
///
/// Returns whether this crate's subscriber is the one in place. Without a
/// valid `RUST_LOG`, or when the host already installed a global subscriber,
/// nothing is installed and the answer is `false`. Only the first call does
/// any work.
pub fn init_tracing() -> bool {
    *TRACING.get_or_init(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return false;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_thread_names(true).with_target(false))
            .with(filter)
            .try_init()
            .is_ok()
    })
}

#[cfg(test)]
mod tests;
