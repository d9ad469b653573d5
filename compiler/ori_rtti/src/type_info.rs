//! Applied type constructors.
//!
//! A [`TypeInfo`] pairs a registered constructor with the type infos of its
//! arguments, so `list(pair(int, string))` is a tree of three levels.
//! Argument storage is shared, which makes cloning a type info cheap and
//! lets the comparator short-circuit on identity.

use std::fmt;
use std::sync::Arc;

use crate::table::DescriptorTable;

/// Dense index of a registered type constructor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeCtorId(u32);

impl TypeCtorId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeCtorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A type constructor applied to argument type infos.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeInfo {
    ctor: TypeCtorId,
    args: Arc<[TypeInfo]>,
}

impl TypeInfo {
    /// A type info with no arguments.
    pub fn new(ctor: TypeCtorId) -> Self {
        Self {
            ctor,
            args: Arc::from(Vec::new()),
        }
    }

    /// A type info applying `ctor` to `args`.
    ///
    /// Arity is not checked here; the comparator reports a mismatch when it
    /// meets one.
    pub fn applied(ctor: TypeCtorId, args: impl IntoIterator<Item = TypeInfo>) -> Self {
        Self {
            ctor,
            args: args.into_iter().collect(),
        }
    }

    #[inline]
    pub fn ctor(&self) -> TypeCtorId {
        self.ctor
    }

    #[inline]
    pub fn args(&self) -> &[TypeInfo] {
        &self.args
    }

    /// Number of applied arguments.
    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Same constructor and the very same argument storage.
    #[inline]
    pub fn same_object(&self, other: &TypeInfo) -> bool {
        self.ctor == other.ctor && Arc::ptr_eq(&self.args, &other.args)
    }

    /// Render with constructor names looked up in `table`.
    pub fn display<'a>(&'a self, table: &'a DescriptorTable) -> TypeInfoDisplay<'a> {
        TypeInfoDisplay { info: self, table }
    }
}

/// [`fmt::Display`] adapter produced by [`TypeInfo::display`].
pub struct TypeInfoDisplay<'a> {
    info: &'a TypeInfo,
    table: &'a DescriptorTable,
}

impl fmt::Display for TypeInfoDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table.get(self.info.ctor) {
            Some(ctor) => write!(f, "{}.{}", ctor.module_name, ctor.type_name)?,
            None => write!(f, "<unregistered {}>", self.info.ctor)?,
        }
        if let Some((first, rest)) = self.info.args.split_first() {
            write!(f, "(")?;
            first.display(self.table).fmt(f)?;
            for arg in rest {
                write!(f, ", ")?;
                arg.display(self.table).fmt(f)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
