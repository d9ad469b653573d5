//! The abstract machine's register file.
//!
//! Registers are numbered from `r1`. The first
//! [`transient_registers`](crate::MachineConfig::transient_registers) of them
//! form the *transient bank*: storage that nested machine execution reuses
//! for its own arguments and results. Anything an entry point still needs
//! from the transient bank after a nested call must be saved before the call
//! and restored after it; [`Machine::preserving_transients`] does both.
//!
//! Register numbers outside the configured range are a calling-convention
//! violation and panic.
//!
//! [`Machine::preserving_transients`]: crate::Machine::preserving_transients

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use ori_rtti::TypeInfo;
use smallvec::SmallVec;

use crate::config::MachineConfig;

/// A numbered register, `r1` upwards.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Reg(u16);

impl Reg {
    pub const R1: Self = Self(1);
    pub const R2: Self = Self(2);
    pub const R3: Self = Self(3);
    pub const R4: Self = Self(4);

    /// Register `rN`. There is no `r0`.
    ///
    /// # Panics
    /// If `n` is zero.
    pub const fn new(n: u16) -> Self {
        assert!(n > 0, "registers are numbered from r1");
        Self(n)
    }

    #[inline]
    pub const fn number(self) -> u16 {
        self.0
    }

    /// Zero-based slot in register storage.
    #[inline]
    const fn slot(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Input registers of the two-argument operations.
pub const UNIFY_INPUT1: Reg = Reg::R1;
pub const UNIFY_INPUT2: Reg = Reg::R2;
pub const COMPARE_INPUT1: Reg = Reg::R1;
pub const COMPARE_INPUT2: Reg = Reg::R2;
pub const INDEX_INPUT: Reg = Reg::R1;

/// Result registers.
pub const UNIFY_OUTPUT: Reg = Reg::R1;
pub const COMPARE_OUTPUT: Reg = Reg::R1;
pub const INDEX_OUTPUT: Reg = Reg::R1;

/// Outcome of indexing a value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IndexResult {
    /// The type has no index operation.
    Unsupported,
    /// Dense index of the value among its type's functors.
    At(u32),
}

impl IndexResult {
    /// Raw encoding shared with generated code: `-1` for unsupported.
    pub fn to_raw(self) -> i64 {
        match self {
            Self::Unsupported => -1,
            Self::At(n) => i64::from(n),
        }
    }

    /// Decode a raw index word. Any negative value means unsupported.
    pub fn from_raw(raw: i64) -> Self {
        u32::try_from(raw).map_or(Self::Unsupported, Self::At)
    }
}

/// Contents of a register.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Value {
    #[default]
    Empty,
    Int(i64),
    Bool(bool),
    Str(Arc<str>),
    TypeInfo(TypeInfo),
    Ordering(Ordering),
    Index(IndexResult),
}

impl Value {
    /// Short name of the variant, for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::TypeInfo(_) => "type_info",
            Self::Ordering(_) => "ordering",
            Self::Index(_) => "index",
        }
    }

    pub fn as_type_info(&self) -> Option<&TypeInfo> {
        match self {
            Self::TypeInfo(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_ordering(&self) -> Option<Ordering> {
        match self {
            Self::Ordering(ord) => Some(*ord),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<IndexResult> {
        match self {
            Self::Index(index) => Some(*index),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl From<TypeInfo> for Value {
    fn from(info: TypeInfo) -> Self {
        Self::TypeInfo(info)
    }
}

impl From<Ordering> for Value {
    fn from(ord: Ordering) -> Self {
        Self::Ordering(ord)
    }
}

impl From<IndexResult> for Value {
    fn from(index: IndexResult) -> Self {
        Self::Index(index)
    }
}

/// Saved contents of the transient bank.
///
/// Produced by [`RegisterFile::save_transient`] and consumed by
/// [`RegisterFile::restore_transient`].
#[derive(Clone, Debug)]
#[must_use = "a transient snapshot does nothing unless restored"]
pub struct TransientSnapshot {
    values: SmallVec<[Value; MachineConfig::DEFAULT_TRANSIENT_REGISTERS]>,
}

/// Argument and result registers of one machine, plus the success slot.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    /// `r1..=rN` for the transient bank size `N`.
    transient: Vec<Value>,
    /// Registers above the transient bank.
    general: Vec<Value>,
    /// Outcome of the last semidet operation.
    success: bool,
}

impl RegisterFile {
    pub fn new(config: &MachineConfig) -> Self {
        let transient = config.transient_registers;
        let general = config.total_registers.saturating_sub(transient);
        Self {
            transient: vec![Value::Empty; transient],
            general: vec![Value::Empty; general],
            success: false,
        }
    }

    /// Number of numbered registers.
    #[inline]
    pub fn len(&self) -> usize {
        self.transient.len() + self.general.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn transient_len(&self) -> usize {
        self.transient.len()
    }

    #[inline]
    pub fn is_transient(&self, reg: Reg) -> bool {
        reg.slot() < self.transient.len()
    }

    /// Whether `reg` exists in this register file.
    #[inline]
    pub fn contains(&self, reg: Reg) -> bool {
        reg.slot() < self.len()
    }

    pub fn get(&self, reg: Reg) -> &Value {
        let slot = reg.slot();
        match self.transient.get(slot) {
            Some(value) => value,
            None => &self.general[slot - self.transient.len()],
        }
    }

    pub fn set(&mut self, reg: Reg, value: impl Into<Value>) {
        *self.slot_mut(reg) = value.into();
    }

    /// Move the contents out of `reg`, leaving it empty.
    pub fn take(&mut self, reg: Reg) -> Value {
        std::mem::take(self.slot_mut(reg))
    }

    fn slot_mut(&mut self, reg: Reg) -> &mut Value {
        let slot = reg.slot();
        let transient_len = self.transient.len();
        match self.transient.get_mut(slot) {
            Some(value) => value,
            None => &mut self.general[slot - transient_len],
        }
    }

    #[inline]
    pub fn success(&self) -> bool {
        self.success
    }

    #[inline]
    pub fn set_success(&mut self, success: bool) {
        self.success = success;
    }

    /// Copy the transient bank out, ahead of a nested call.
    pub fn save_transient(&self) -> TransientSnapshot {
        TransientSnapshot {
            values: self.transient.iter().cloned().collect(),
        }
    }

    /// Put a saved transient bank back after a nested call.
    pub fn restore_transient(&mut self, snapshot: TransientSnapshot) {
        for (slot, value) in self.transient.iter_mut().zip(snapshot.values) {
            *slot = value;
        }
    }

    /// Empty every register in the transient bank.
    pub fn clear_transient(&mut self) {
        self.transient.fill(Value::Empty);
    }
}
