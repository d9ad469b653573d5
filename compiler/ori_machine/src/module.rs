//! Module registration.
//!
//! Every runtime module contributes its definitions through one init
//! function. The registration pass calls each init exactly once, in the
//! order the modules are supplied, and then links the result.

use std::fmt;

use crate::error::LinkError;
use crate::linkage::{Linkage, LinkageBuilder};

pub type ModuleInit = fn(&mut LinkageBuilder) -> Result<(), LinkError>;

/// A named unit of runtime definitions.
#[derive(Copy, Clone)]
pub struct RuntimeModule {
    pub name: &'static str,
    pub init: ModuleInit,
}

impl RuntimeModule {
    pub const fn new(name: &'static str, init: ModuleInit) -> Self {
        Self { name, init }
    }
}

impl fmt::Debug for RuntimeModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeModule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Run every module's init in order and link the definitions.
#[tracing::instrument(level = "debug", skip_all, fields(modules = modules.len()))]
pub fn link_modules(modules: &[RuntimeModule]) -> Result<Linkage, LinkError> {
    let mut builder = LinkageBuilder::new();
    for module in modules {
        tracing::trace!(module = module.name, "registering module");
        builder.enter_module(module.name);
        (module.init)(&mut builder)?;
    }
    builder.link()
}
