//! Fallback linkage.
//!
//! Modules define routines and type constructor descriptors under
//! well-known [`Symbol`]s, each with a [`Strength`]. A generic fallback is
//! defined [`Weak`](Strength::Weak); a specialization emitted by the code
//! generator is defined [`Strong`](Strength::Strong). Resolution rules:
//!
//! | existing | new | outcome |
//! |---|---|---|
//! | weak | strong | strong replaces weak |
//! | strong | weak | weak discarded |
//! | weak | weak | first one kept |
//! | strong | strong | [`LinkError::DuplicateSymbol`] |
//!
//! Resolution happens once, in [`LinkageBuilder::link`]. Afterwards every
//! well-known name maps to a single [`CodeAddr`], so a call through it costs
//! the same whichever definition won. Addresses and descriptor ids follow the
//! order in which symbols were first defined, which makes the result
//! independent of anything but module order.

use std::sync::Arc;

use ori_rtti::{
    CodeAddr, DescriptorTable, FunctorsInfo, LayoutInfo, SharedDescriptorTable, TypeCtorId,
    TypeCtorInfo, TypeCtorRep,
};
use rustc_hash::FxHashMap;

use crate::code::{CodeTable, EntryFn};
use crate::error::{LinkError, MachineFault};
use crate::symbol::{special_pred, type_ctor_info, SpecialPred, Symbol};

/// How a definition behaves when another module defines the same symbol.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Strength {
    /// Generic fallback; loses to any strong definition.
    Weak,
    /// Specialized definition.
    Strong,
}

/// A descriptor before linking: entries are still symbol names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCtorDef {
    pub arity: u32,
    pub unify: Symbol,
    pub index: Symbol,
    pub compare: Symbol,
    pub rep: TypeCtorRep,
    pub functors: FunctorsInfo,
    pub layout: LayoutInfo,
    pub module_name: Arc<str>,
    pub type_name: Arc<str>,
}

impl TypeCtorDef {
    /// A descriptor whose three entries use the well-known names.
    pub fn new(module_name: &str, type_name: &str, arity: u32, rep: TypeCtorRep) -> Self {
        Self {
            arity,
            unify: special_pred(SpecialPred::Unify, module_name, type_name, arity),
            index: special_pred(SpecialPred::Index, module_name, type_name, arity),
            compare: special_pred(SpecialPred::Compare, module_name, type_name, arity),
            rep,
            functors: FunctorsInfo::default(),
            layout: LayoutInfo::default(),
            module_name: Arc::from(module_name),
            type_name: Arc::from(type_name),
        }
    }

    #[must_use]
    pub fn with_functors(mut self, functors: FunctorsInfo) -> Self {
        self.functors = functors;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutInfo) -> Self {
        self.layout = layout;
        self
    }

    /// Point one operation at a routine other than its well-known name.
    #[must_use]
    pub fn with_entry(mut self, pred: SpecialPred, symbol: Symbol) -> Self {
        match pred {
            SpecialPred::Unify => self.unify = symbol,
            SpecialPred::Index => self.index = symbol,
            SpecialPred::Compare => self.compare = symbol,
        }
        self
    }

    pub fn entry(&self, pred: SpecialPred) -> &Symbol {
        match pred {
            SpecialPred::Unify => &self.unify,
            SpecialPred::Index => &self.index,
            SpecialPred::Compare => &self.compare,
        }
    }

    /// The descriptor's own linkage name.
    pub fn symbol(&self) -> Symbol {
        type_ctor_info(&self.module_name, &self.type_name, self.arity)
    }
}

struct Definition<T> {
    value: T,
    strength: Strength,
    module: Arc<str>,
}

/// Symbols in first-definition order, each with its surviving definition.
struct SymbolSlots<T> {
    slots: Vec<(Symbol, Definition<T>)>,
    index: FxHashMap<Symbol, usize>,
}

impl<T> Default for SymbolSlots<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T> SymbolSlots<T> {
    fn define(&mut self, symbol: Symbol, new: Definition<T>) -> Result<(), LinkError> {
        let Some(&i) = self.index.get(&symbol) else {
            self.index.insert(symbol.clone(), self.slots.len());
            self.slots.push((symbol, new));
            return Ok(());
        };
        let existing = &mut self.slots[i].1;
        match (existing.strength, new.strength) {
            (Strength::Weak, Strength::Strong) => {
                tracing::debug!(
                    %symbol,
                    generic = %existing.module,
                    specialized = %new.module,
                    "specialized definition replaces generic one"
                );
                *existing = new;
            }
            (Strength::Strong | Strength::Weak, Strength::Weak) => {
                tracing::debug!(
                    %symbol,
                    kept = %existing.module,
                    discarded = %new.module,
                    "discarding weak definition"
                );
            }
            (Strength::Strong, Strength::Strong) => {
                return Err(LinkError::DuplicateSymbol {
                    symbol,
                    first: Arc::clone(&existing.module),
                    second: new.module,
                });
            }
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Collects definitions from every module, then links them once.
pub struct LinkageBuilder {
    module: Arc<str>,
    modules: Vec<Arc<str>>,
    entries: SymbolSlots<EntryFn>,
    type_ctors: SymbolSlots<TypeCtorDef>,
}

impl Default for LinkageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkageBuilder {
    pub fn new() -> Self {
        Self {
            module: Arc::from("<toplevel>"),
            modules: Vec::new(),
            entries: SymbolSlots::default(),
            type_ctors: SymbolSlots::default(),
        }
    }

    /// Attribute subsequent definitions to `name`.
    pub fn enter_module(&mut self, name: &str) {
        self.module = Arc::from(name);
        self.modules.push(Arc::clone(&self.module));
    }

    pub fn define_entry(
        &mut self,
        symbol: Symbol,
        strength: Strength,
        routine: EntryFn,
    ) -> Result<(), LinkError> {
        self.entries.define(
            symbol,
            Definition {
                value: routine,
                strength,
                module: Arc::clone(&self.module),
            },
        )
    }

    pub fn define_type_ctor(
        &mut self,
        def: TypeCtorDef,
        strength: Strength,
    ) -> Result<(), LinkError> {
        self.type_ctors.define(
            def.symbol(),
            Definition {
                value: def,
                strength,
                module: Arc::clone(&self.module),
            },
        )
    }

    /// Resolve every symbol and freeze the result.
    #[tracing::instrument(level = "debug", skip_all, fields(
        modules = self.modules.len(),
        entries = self.entries.len(),
        type_ctors = self.type_ctors.len(),
    ))]
    pub fn link(self) -> Result<Linkage, LinkError> {
        let mut code = CodeTable::new();
        let mut entries = FxHashMap::default();
        for (symbol, def) in self.entries.slots {
            tracing::trace!(%symbol, module = %def.module, "linking entry");
            let addr = code.push(symbol.clone(), def.value);
            entries.insert(symbol, addr);
        }

        let mut table = DescriptorTable::new();
        let mut type_ctors = FxHashMap::default();
        for (symbol, def) in self.type_ctors.slots {
            let def = def.value;
            let resolve = |pred: SpecialPred| {
                let target = def.entry(pred);
                entries
                    .get(target)
                    .copied()
                    .ok_or_else(|| LinkError::UndefinedSymbol {
                        symbol: target.clone(),
                        referenced_by: symbol.clone(),
                    })
            };
            let info = TypeCtorInfo {
                arity: def.arity,
                unify_entry: resolve(SpecialPred::Unify)?,
                index_entry: resolve(SpecialPred::Index)?,
                compare_entry: resolve(SpecialPred::Compare)?,
                rep: def.rep,
                functors: def.functors,
                layout: def.layout,
                module_name: def.module_name,
                type_name: def.type_name,
            };
            let id = table.insert(info)?;
            type_ctors.insert(symbol, id);
        }
        table.validate()?;

        tracing::debug!(
            routines = code.len(),
            descriptors = table.len(),
            "linkage complete"
        );
        Ok(Linkage {
            code,
            entries,
            descriptors: SharedDescriptorTable::new(table),
            type_ctors,
            modules: self.modules,
        })
    }
}

/// Resolved, immutable linkage of every registered module.
#[derive(Debug)]
pub struct Linkage {
    code: CodeTable,
    entries: FxHashMap<Symbol, CodeAddr>,
    descriptors: SharedDescriptorTable,
    type_ctors: FxHashMap<Symbol, TypeCtorId>,
    modules: Vec<Arc<str>>,
}

impl Linkage {
    pub fn code(&self) -> &CodeTable {
        &self.code
    }

    pub fn descriptors(&self) -> &SharedDescriptorTable {
        &self.descriptors
    }

    /// Address a symbol resolved to.
    pub fn entry(&self, symbol: &str) -> Option<CodeAddr> {
        self.entries.get(symbol).copied()
    }

    /// Like [`entry`](Self::entry), for callers inside the machine.
    pub fn require_entry(&self, symbol: &str) -> Result<CodeAddr, MachineFault> {
        self.entry(symbol)
            .ok_or_else(|| MachineFault::UnresolvedSymbol(Symbol::new(symbol)))
    }

    /// Descriptor id a `type_ctor_info_*` symbol resolved to.
    pub fn type_ctor(&self, symbol: &str) -> Option<TypeCtorId> {
        self.type_ctors.get(symbol).copied()
    }

    #[inline]
    pub fn routine(&self, addr: CodeAddr) -> Option<EntryFn> {
        self.code.routine(addr)
    }

    pub fn label(&self, addr: CodeAddr) -> Option<&Symbol> {
        self.code.label(addr)
    }

    /// Modules in registration order.
    pub fn modules(&self) -> &[Arc<str>] {
        &self.modules
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
