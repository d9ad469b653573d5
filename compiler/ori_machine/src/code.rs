//! Entry routines, continuations and the code table.
//!
//! An entry routine does its work on the machine's registers and then says
//! where control goes next by returning a [`Continuation`]. The engine's
//! trampoline interprets that value, so no routine ever calls the next one
//! directly and native stack depth stays flat however long the chain is.

use std::fmt;

use ori_rtti::CodeAddr;

use crate::engine::Machine;
use crate::error::MachineFault;
use crate::symbol::Symbol;

/// Where control goes when an entry routine finishes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Continuation {
    /// Return to the innermost pending `resume` address, or complete the
    /// current `call_engine` when there is none.
    Proceed,
    /// Continue at `target` without pushing a return point (tail call).
    Jump(CodeAddr),
    /// Run `target`; when it proceeds, continue at `resume`.
    Call { target: CodeAddr, resume: CodeAddr },
}

/// Signature of every routine in the code table.
pub type EntryFn = fn(&mut Machine) -> Result<Continuation, MachineFault>;

/// One linked routine.
#[derive(Clone)]
pub struct CodeEntry {
    pub label: Symbol,
    pub routine: EntryFn,
}

impl fmt::Debug for CodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeEntry").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Every linked routine, addressed by [`CodeAddr`].
#[derive(Clone, Debug, Default)]
pub struct CodeTable {
    entries: Vec<CodeEntry>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a routine and return its address.
    pub fn push(&mut self, label: Symbol, routine: EntryFn) -> CodeAddr {
        let raw = u32::try_from(self.entries.len()).unwrap_or(u32::MAX);
        self.entries.push(CodeEntry { label, routine });
        CodeAddr::from_raw(raw)
    }

    #[inline]
    pub fn get(&self, addr: CodeAddr) -> Option<&CodeEntry> {
        self.entries.get(addr.index())
    }

    #[inline]
    pub fn routine(&self, addr: CodeAddr) -> Option<EntryFn> {
        self.get(addr).map(|entry| entry.routine)
    }

    pub fn label(&self, addr: CodeAddr) -> Option<&Symbol> {
        self.get(addr).map(|entry| &entry.label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
