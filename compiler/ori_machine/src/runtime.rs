//! The linked runtime and its process-wide instance.
//!
//! A [`Runtime`] is the frozen result of registering and linking a set of
//! modules, together with the machine configuration. It is shared between
//! machines (and threads) by reference count; nothing writes to it after
//! linking.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::bootstrap::BOOTSTRAP_MODULE;
use crate::config::MachineConfig;
use crate::engine::Machine;
use crate::error::LinkError;
use crate::generic::BUILTIN_MODULE;
use crate::linkage::Linkage;
use crate::module::{link_modules, RuntimeModule};

/// Modules every runtime starts from.
pub const DEFAULT_MODULES: &[RuntimeModule] = &[BOOTSTRAP_MODULE, BUILTIN_MODULE];

struct RuntimeInner {
    linkage: Linkage,
    config: MachineConfig,
}

/// Linked code and descriptors plus the configuration machines are built
/// with. Cheap to clone.
#[derive(Clone)]
pub struct Runtime(Arc<RuntimeInner>);

impl Runtime {
    /// Register and link `modules` in order.
    pub fn link(modules: &[RuntimeModule], config: MachineConfig) -> Result<Self, LinkError> {
        let linkage = link_modules(modules)?;
        Ok(Self::from_linkage(linkage, config))
    }

    pub fn from_linkage(linkage: Linkage, config: MachineConfig) -> Self {
        Runtime(Arc::new(RuntimeInner { linkage, config }))
    }

    /// A fresh machine with empty registers.
    pub fn machine(&self) -> Machine {
        Machine::new(self.clone())
    }

    pub fn linkage(&self) -> &Linkage {
        &self.0.linkage
    }

    pub fn config(&self) -> &MachineConfig {
        &self.0.config
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("modules", &self.0.linkage.modules())
            .field("routines", &self.0.linkage.code().len())
            .field("descriptors", &self.0.linkage.descriptors().len())
            .field("config", &self.0.config)
            .finish()
    }
}

static GLOBAL: OnceLock<Runtime> = OnceLock::new();

/// Link `modules` into the process-wide runtime.
///
/// Only the first successful call links anything; later calls return the
/// runtime it produced and ignore their arguments. Configuration comes from
/// the environment, see [`MachineConfig::from_env`].
pub fn init_runtime(modules: &[RuntimeModule]) -> Result<&'static Runtime, LinkError> {
    if let Some(runtime) = GLOBAL.get() {
        return Ok(runtime);
    }
    let runtime = Runtime::link(modules, MachineConfig::from_env())?;
    tracing::debug!(?runtime, "runtime initialized");
    Ok(GLOBAL.get_or_init(|| runtime))
}

/// The process-wide runtime, if [`init_runtime`] has succeeded.
pub fn global_runtime() -> Option<&'static Runtime> {
    GLOBAL.get()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
