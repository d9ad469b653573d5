//! Link errors and machine faults.
//!
//! Neither kind is retried. A [`LinkError`] stops runtime initialization; a
//! [`MachineFault`] aborts the current `call_engine` and is handed to
//! whoever started the machine.

use std::sync::Arc;

use ori_rtti::{CodeAddr, ConsistencyError};

use crate::registers::Reg;
use crate::symbol::Symbol;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("`{symbol}` has a strong definition in both `{first}` and `{second}`")]
    DuplicateSymbol {
        symbol: Symbol,
        first: Arc<str>,
        second: Arc<str>,
    },

    #[error("`{referenced_by}` refers to `{symbol}`, which is never defined")]
    UndefinedSymbol {
        symbol: Symbol,
        referenced_by: Symbol,
    },

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MachineFault {
    #[error("no routine at code address {0}")]
    UnknownCodeAddr(CodeAddr),

    #[error("{reg} holds {found}, expected {expected}")]
    RegisterType {
        reg: Reg,
        expected: &'static str,
        found: &'static str,
    },

    #[error("call needs {needed} registers, machine has {available}")]
    RegisterOverflow { needed: usize, available: usize },

    #[error("nested call_engine depth exceeds the limit of {0}")]
    NestingLimit(usize),

    #[error("`{0}` is not linked")]
    UnresolvedSymbol(Symbol),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}
