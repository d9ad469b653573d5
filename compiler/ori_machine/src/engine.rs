//! The engine entry invoker.
//!
//! [`Machine::call_engine`] runs linked code from an entry address until its
//! continuation chain completes. Routines never call each other directly:
//! each returns a [`Continuation`] and the trampoline here decides what runs
//! next, so a chain of any length uses constant native stack.
//!
//! `call_engine` is re-entrant. A routine may start a nested run on the same
//! machine; the nested run gets its own region of the resume stack and the
//! caller's pending resume addresses are untouched when it returns. Nested
//! runs reuse the transient registers, so callers bracket them with
//! [`Machine::preserving_transients`]. Each run starts with stack headroom
//! for one more level, so the nesting limit, not the thread's stack, bounds
//! how deep they go.
//!
//! Only fatal faults come back as `Err`. Whether the invoked code succeeded
//! is reported through registers, the way generated code reports it.

mod transients;

use ori_rtti::{ensure_sufficient_stack, CodeAddr, SharedDescriptorTable, TypeInfo};

use crate::code::Continuation;
use crate::config::MachineConfig;
use crate::error::MachineFault;
use crate::linkage::Linkage;
use crate::registers::{Reg, RegisterFile, Value};
use crate::runtime::Runtime;

pub use transients::PreservedTransients;

/// One execution context bound to a linked [`Runtime`].
///
/// The register file is private to the machine; the runtime behind it is
/// shared and read-only.
#[derive(Debug)]
pub struct Machine {
    runtime: Runtime,
    pub regs: RegisterFile,
    /// Pending `resume` addresses of every active `call_engine`.
    resume: Vec<CodeAddr>,
    /// Number of active `call_engine` invocations.
    depth: usize,
}

impl Machine {
    pub fn new(runtime: Runtime) -> Self {
        let regs = RegisterFile::new(runtime.config());
        Self {
            runtime,
            regs,
            resume: Vec::new(),
            depth: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn linkage(&self) -> &Linkage {
        self.runtime.linkage()
    }

    pub fn descriptors(&self) -> &SharedDescriptorTable {
        self.runtime.linkage().descriptors()
    }

    pub fn config(&self) -> &MachineConfig {
        self.runtime.config()
    }

    /// Number of `call_engine` invocations currently active.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run the code at `entry` until it proceeds with nothing left to
    /// resume.
    #[tracing::instrument(level = "trace", skip(self), fields(depth = self.depth))]
    pub fn call_engine(&mut self, entry: CodeAddr) -> Result<(), MachineFault> {
        if let Some(limit) = self.runtime.config().max_nesting {
            if self.depth >= limit {
                return Err(MachineFault::NestingLimit(limit));
            }
        }

        let base = self.resume.len();
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.run(entry, base));
        self.depth -= 1;
        self.resume.truncate(base);

        if let Err(fault) = &result {
            if self.depth == 0 {
                tracing::error!(%fault, %entry, "machine fault");
            }
        }
        result
    }

    /// Look up `symbol` and [`call_engine`](Self::call_engine) it.
    pub fn call_symbol(&mut self, symbol: &str) -> Result<(), MachineFault> {
        let entry = self.linkage().require_entry(symbol)?;
        self.call_engine(entry)
    }

    fn run(&mut self, entry: CodeAddr, base: usize) -> Result<(), MachineFault> {
        let mut pc = entry;
        loop {
            let routine = self
                .linkage()
                .routine(pc)
                .ok_or(MachineFault::UnknownCodeAddr(pc))?;
            tracing::trace!(%pc, "enter");
            pc = match routine(self)? {
                Continuation::Proceed => {
                    if self.resume.len() == base {
                        return Ok(());
                    }
                    match self.resume.pop() {
                        Some(resume) => resume,
                        None => return Ok(()),
                    }
                }
                Continuation::Jump(target) => target,
                Continuation::Call { target, resume } => {
                    self.resume.push(resume);
                    target
                }
            };
        }
    }

    /// The type info in `reg`, or a fault naming what is there instead.
    pub fn type_info_arg(&self, reg: Reg) -> Result<TypeInfo, MachineFault> {
        match self.regs.get(reg) {
            Value::TypeInfo(info) => Ok(info.clone()),
            other => Err(MachineFault::RegisterType {
                reg,
                expected: "type_info",
                found: other.kind(),
            }),
        }
    }

    /// Fail unless registers `r1..=rN` exist.
    pub fn check_registers(&self, needed: usize) -> Result<(), MachineFault> {
        if needed > self.regs.len() {
            return Err(MachineFault::RegisterOverflow {
                needed,
                available: self.regs.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
