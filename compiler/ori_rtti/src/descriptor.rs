//! Type constructor descriptors.
//!
//! A [`TypeCtorInfo`] is the runtime record for one type constructor. Field
//! order mirrors the layout generated code expects:
//!
//! ```text
//! arity | unify_entry | index_entry | compare_entry | rep | functors | layout | module | name
//! ```
//!
//! Exactly one descriptor exists per type constructor per process. Once the
//! registrar has placed it in a [`DescriptorTable`](crate::DescriptorTable)
//! it is only ever reached through an `Arc` and never mutated.

use std::fmt;
use std::sync::Arc;

use crate::layout::{FunctorsInfo, LayoutInfo};

/// Address of a routine in the machine's code table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CodeAddr(u32);

impl CodeAddr {
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

impl fmt::Display for CodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// How values of a type constructor are represented.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeCtorRep {
    /// Constants only, stored as small integers.
    Enum,
    /// Discriminated union with at least one non-constant functor.
    Du,
    /// Equivalence to another type.
    Equiv,
    /// Single functor with a single field; no tag stored.
    NoTag,
    Int,
    Char,
    Float,
    String,
    /// Higher-order predicate. Arity comes from each type info.
    Pred,
    /// Higher-order function. Arity comes from each type info.
    Func,
    /// Tuple. Arity comes from each type info.
    Tuple,
    /// The `type_info` type itself.
    TypeInfo,
    /// The `type_ctor_info` type.
    TypeCtorInfo,
    /// Universal (type-erased) values.
    Univ,
    /// Handled entirely by hand-written runtime code.
    Special,
}

impl TypeCtorRep {
    /// Whether each application of this constructor picks its own arity.
    #[inline]
    pub const fn is_variable_arity(self) -> bool {
        matches!(self, Self::Pred | Self::Func | Self::Tuple)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::Du => "du",
            Self::Equiv => "equiv",
            Self::NoTag => "notag",
            Self::Int => "int",
            Self::Char => "char",
            Self::Float => "float",
            Self::String => "string",
            Self::Pred => "pred",
            Self::Func => "func",
            Self::Tuple => "tuple",
            Self::TypeInfo => "type_info",
            Self::TypeCtorInfo => "type_ctor_info",
            Self::Univ => "univ",
            Self::Special => "special",
        }
    }
}

/// Identity of a type constructor: module, name and declared arity.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TypeCtorKey {
    pub module_name: Arc<str>,
    pub type_name: Arc<str>,
    pub arity: u32,
}

impl TypeCtorKey {
    pub fn new(module_name: &str, type_name: &str, arity: u32) -> Self {
        Self {
            module_name: Arc::from(module_name),
            type_name: Arc::from(type_name),
            arity,
        }
    }
}

impl fmt::Display for TypeCtorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}/{}", self.module_name, self.type_name, self.arity)
    }
}

/// Runtime descriptor of a type constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCtorInfo {
    /// Number of type parameters.
    pub arity: u32,
    pub unify_entry: CodeAddr,
    pub index_entry: CodeAddr,
    pub compare_entry: CodeAddr,
    pub rep: TypeCtorRep,
    pub functors: FunctorsInfo,
    pub layout: LayoutInfo,
    pub module_name: Arc<str>,
    pub type_name: Arc<str>,
}

impl TypeCtorInfo {
    pub fn key(&self) -> TypeCtorKey {
        TypeCtorKey {
            module_name: Arc::clone(&self.module_name),
            type_name: Arc::clone(&self.type_name),
            arity: self.arity,
        }
    }

    #[inline]
    pub fn is_variable_arity(&self) -> bool {
        self.rep.is_variable_arity()
    }

    /// Whether `n` applied arguments fit this constructor.
    #[inline]
    pub fn accepts_arity(&self, n: usize) -> bool {
        self.is_variable_arity() || n == self.arity as usize
    }
}

impl fmt::Display for TypeCtorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}/{}", self.module_name, self.type_name, self.arity)
    }
}
