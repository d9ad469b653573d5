//! Internal consistency violations.
//!
//! None of these are recoverable. They mean generated code or the registrar
//! broke a precondition, and the engine escalates them as faults.

use crate::descriptor::TypeCtorKey;
use crate::type_info::TypeCtorId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("type constructor {0} is not registered")]
    UnregisteredTypeCtor(TypeCtorId),

    #[error("layout of `{owner}` refers to `{target}`, which is not registered")]
    UnregisteredLayoutRef {
        owner: TypeCtorKey,
        target: TypeCtorKey,
    },

    #[error("`{ctor}` takes {expected} type argument(s), type info applies {found}")]
    ArityMismatch {
        ctor: TypeCtorKey,
        expected: u32,
        found: usize,
    },

    #[error("type constructor `{0}` is registered twice")]
    DuplicateTypeCtor(TypeCtorKey),
}
