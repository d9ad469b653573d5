//! Save and restore of the transient register bank around nested calls.
//!
//! ```text
//! {
//!     let mut guard = machine.preserving_transients();
//!     guard.call_engine(entry)?;
//!     result = guard.regs.take(Reg::R1);
//! } // transients restored here, also on early return or panic
//! machine.regs.set(Reg::R1, result);
//! ```

use std::ops::{Deref, DerefMut};

use crate::registers::TransientSnapshot;

use super::Machine;

/// Restores the transient bank it saved when dropped.
///
/// Derefs to the machine, so nested calls go through the guard.
pub struct PreservedTransients<'m> {
    machine: &'m mut Machine,
    snapshot: Option<TransientSnapshot>,
}

impl Drop for PreservedTransients<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.machine.regs.restore_transient(snapshot);
        }
    }
}

impl Deref for PreservedTransients<'_> {
    type Target = Machine;

    fn deref(&self) -> &Self::Target {
        self.machine
    }
}

impl DerefMut for PreservedTransients<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.machine
    }
}

impl Machine {
    /// Save the transient bank; it is restored when the guard drops.
    pub fn preserving_transients(&mut self) -> PreservedTransients<'_> {
        let snapshot = self.regs.save_transient();
        PreservedTransients {
            machine: self,
            snapshot: Some(snapshot),
        }
    }

    /// Run `f` with the transient bank restored afterwards.
    pub fn with_preserved_transients<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Machine) -> T,
    {
        let mut guard = self.preserving_transients();
        f(&mut guard)
    }
}
