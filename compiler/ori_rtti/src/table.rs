//! The process-wide descriptor table.
//!
//! Built once by the linkage pass, then frozen into a
//! [`SharedDescriptorTable`] and read concurrently without locking. There is
//! no API for removing or replacing a descriptor.
//!
//! # Design
//!
//! - Dense `Vec` storage indexed by [`TypeCtorId`]
//! - `FxHashMap` from [`TypeCtorKey`] for lookup by name
//! - Insertion order fixes the ids, so linking is deterministic

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::descriptor::{TypeCtorInfo, TypeCtorKey};
use crate::error::ConsistencyError;
use crate::type_info::{TypeCtorId, TypeInfo};

#[derive(Clone, Debug, Default)]
pub struct DescriptorTable {
    ctors: Vec<TypeCtorInfo>,
    by_key: FxHashMap<TypeCtorKey, TypeCtorId>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor and return its id.
    ///
    /// A second descriptor for the same constructor is rejected: the one
    /// descriptor per constructor invariant is what lets the comparator
    /// order constructors by name alone.
    pub fn insert(&mut self, info: TypeCtorInfo) -> Result<TypeCtorId, ConsistencyError> {
        let key = info.key();
        if self.by_key.contains_key(&key) {
            return Err(ConsistencyError::DuplicateTypeCtor(key));
        }
        let raw = u32::try_from(self.ctors.len()).unwrap_or(u32::MAX);
        let id = TypeCtorId::from_raw(raw);
        tracing::trace!(%key, %id, "registered type constructor");
        self.ctors.push(info);
        self.by_key.insert(key, id);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: TypeCtorId) -> Option<&TypeCtorInfo> {
        self.ctors.get(id.index())
    }

    /// Like [`get`](Self::get), but an unknown id is a consistency error.
    #[inline]
    pub fn resolve(&self, id: TypeCtorId) -> Result<&TypeCtorInfo, ConsistencyError> {
        self.get(id).ok_or(ConsistencyError::UnregisteredTypeCtor(id))
    }

    pub fn lookup(&self, module_name: &str, type_name: &str, arity: u32) -> Option<TypeCtorId> {
        self.lookup_key(&TypeCtorKey::new(module_name, type_name, arity))
    }

    pub fn lookup_key(&self, key: &TypeCtorKey) -> Option<TypeCtorId> {
        self.by_key.get(key).copied()
    }

    /// Build a type info for a registered constructor, checking its arity.
    pub fn instantiate(
        &self,
        id: TypeCtorId,
        args: impl IntoIterator<Item = TypeInfo>,
    ) -> Result<TypeInfo, ConsistencyError> {
        let info = TypeInfo::applied(id, args);
        let ctor = self.resolve(id)?;
        if !ctor.accepts_arity(info.arity()) {
            return Err(ConsistencyError::ArityMismatch {
                ctor: ctor.key(),
                expected: ctor.arity,
                found: info.arity(),
            });
        }
        Ok(info)
    }

    /// Check that every layout reference names a registered constructor.
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        for ctor in &self.ctors {
            if let Some(target) = ctor.layout.referenced_ctor() {
                if !self.by_key.contains_key(target) {
                    return Err(ConsistencyError::UnregisteredLayoutRef {
                        owner: ctor.key(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ctors.is_empty()
    }

    /// Descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeCtorId, &TypeCtorInfo)> {
        self.ctors.iter().enumerate().map(|(i, ctor)| {
            let raw = u32::try_from(i).unwrap_or(u32::MAX);
            (TypeCtorId::from_raw(raw), ctor)
        })
    }
}

/// Frozen, cheaply clonable descriptor table.
pub struct SharedDescriptorTable(Arc<DescriptorTable>);

impl SharedDescriptorTable {
    pub fn new(table: DescriptorTable) -> Self {
        SharedDescriptorTable(Arc::new(table))
    }
}

impl Clone for SharedDescriptorTable {
    fn clone(&self) -> Self {
        SharedDescriptorTable(Arc::clone(&self.0))
    }
}

impl std::ops::Deref for SharedDescriptorTable {
    type Target = DescriptorTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for SharedDescriptorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedDescriptorTable({} ctors)", self.0.len())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
