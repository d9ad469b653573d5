//! Runtime type information for the Ori abstract machine.
//!
//! Generated code normally carries specialized unify/compare/index routines
//! for every concrete type. When a type is only ever used polymorphically no
//! specialization exists, and the runtime falls back to the structural
//! operations defined here, which look only at type descriptors.
//!
//! # Pieces
//!
//! - [`TypeCtorInfo`]: the descriptor of one type constructor (arity, entry
//!   points, layout metadata, identifying names)
//! - [`TypeInfo`]: a type constructor applied to argument type infos
//! - [`DescriptorTable`]: every registered descriptor, built once and then
//!   shared read-only
//! - [`compare_type_info`]: the structural total order over type infos
//!
//! Entry points are stored as [`CodeAddr`]s. What lives at an address is the
//! business of the machine crate; this crate never calls through them.

mod compare;
mod descriptor;
mod error;
mod layout;
mod stack;
mod table;
mod type_info;

#[cfg(test)]
mod test_helpers;

pub use compare::{compare_type_ctor, compare_type_info, unify_type_info};
pub use descriptor::{CodeAddr, TypeCtorInfo, TypeCtorKey, TypeCtorRep};
pub use error::ConsistencyError;
pub use layout::{FunctorDesc, FunctorsInfo, LayoutInfo};
pub use stack::ensure_sufficient_stack;
pub use table::{DescriptorTable, SharedDescriptorTable};
pub use type_info::{TypeCtorId, TypeInfo, TypeInfoDisplay};
