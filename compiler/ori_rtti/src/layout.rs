//! Structural metadata carried by descriptors.
//!
//! The comparator treats these as opaque, with one exception: a layout may
//! name another type constructor (an equivalence target), and that
//! constructor must be registered. [`DescriptorTable::validate`] checks it.
//!
//! [`DescriptorTable::validate`]: crate::DescriptorTable::validate

use std::sync::Arc;

use crate::descriptor::TypeCtorKey;

/// One functor of a discriminated union.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctorDesc {
    pub name: Arc<str>,
    pub arity: u32,
}

impl FunctorDesc {
    pub fn new(name: &str, arity: u32) -> Self {
        Self {
            name: Arc::from(name),
            arity,
        }
    }
}

/// The functor table of a type constructor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FunctorsInfo {
    /// No functor table; values are handled by special runtime code.
    #[default]
    Special,
    /// Constant functors in declaration order.
    Enum(Arc<[Arc<str>]>),
    /// Functors of a discriminated union in declaration order.
    Du(Arc<[FunctorDesc]>),
    /// The single functor of an equivalence or no-tag type.
    Equiv,
}

impl FunctorsInfo {
    /// Number of functors, when the table lists them.
    pub fn functor_count(&self) -> Option<usize> {
        match self {
            Self::Enum(names) => Some(names.len()),
            Self::Du(functors) => Some(functors.len()),
            Self::Equiv => Some(1),
            Self::Special => None,
        }
    }
}

/// How values of a type constructor are laid out in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutInfo {
    /// Layout known only to hand-written code.
    #[default]
    Opaque,
    /// Every tag denotes a type-info word.
    TypeInfoValue,
    /// Constants stored as small integers.
    Const,
    /// Tagged heap cells.
    Tagged,
    /// Same layout as the named type constructor.
    Equivalence(TypeCtorKey),
}

impl LayoutInfo {
    /// Type constructor this layout refers to, if any.
    pub fn referenced_ctor(&self) -> Option<&TypeCtorKey> {
        match self {
            Self::Equivalence(key) => Some(key),
            Self::Opaque | Self::TypeInfoValue | Self::Const | Self::Tagged => None,
        }
    }
}
