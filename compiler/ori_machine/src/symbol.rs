//! Well-known linkage names.
//!
//! Generated code and the runtime agree on these names, which is what lets
//! a specialized definition take the place of a generic one:
//!
//! ```text
//! __Unify__<module>__<type>_<arity>_0
//! __Index__<module>__<type>_<arity>_0
//! __Compare__<module>__<type>_<arity>_0
//! type_ctor_info_<module>__<type>_<arity>
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A linkage name.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The three operations every type constructor carries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SpecialPred {
    Unify,
    Index,
    Compare,
}

impl SpecialPred {
    pub const ALL: [SpecialPred; 3] = [Self::Unify, Self::Index, Self::Compare];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Unify => "Unify",
            Self::Index => "Index",
            Self::Compare => "Compare",
        }
    }
}

impl fmt::Display for SpecialPred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of a type constructor's unify, index or compare entry.
pub fn special_pred(pred: SpecialPred, module_name: &str, type_name: &str, arity: u32) -> Symbol {
    Symbol(Arc::from(format!(
        "__{pred}__{module_name}__{type_name}_{arity}_0"
    )))
}

/// Name of a type constructor's descriptor.
pub fn type_ctor_info(module_name: &str, type_name: &str, arity: u32) -> Symbol {
    Symbol(Arc::from(format!(
        "type_ctor_info_{module_name}__{type_name}_{arity}"
    )))
}

/// Name of an ordinary procedure entry, `<module>__<name>_<arity>_<mode>`.
pub fn proc_entry(module_name: &str, name: &str, arity: u32, mode: u32) -> Symbol {
    Symbol(Arc::from(format!("{module_name}__{name}_{arity}_{mode}")))
}
