//! Machine configuration.
//!
//! Defaults suit generated code; every knob can be overridden from the
//! environment at runtime initialization:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `ORI_RT_TRANSIENT_REGS` | registers in the transient bank | 8 |
//! | `ORI_RT_REGS` | total numbered registers | 32 |
//! | `ORI_RT_MAX_NESTING` | nested `call_engine` limit, `0` = unlimited | 256 |

/// Register file shape and engine limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    /// Registers `r1..=rN` that live in the transient bank.
    pub transient_registers: usize,
    /// Total numbered registers, transient ones included.
    pub total_registers: usize,
    /// Maximum depth of nested `call_engine` invocations, `None` for
    /// unlimited.
    pub max_nesting: Option<usize>,
}

impl MachineConfig {
    pub const DEFAULT_TRANSIENT_REGISTERS: usize = 8;
    pub const DEFAULT_TOTAL_REGISTERS: usize = 32;
    pub const DEFAULT_MAX_NESTING: usize = 256;

    /// Defaults overridden by the `ORI_RT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(n) = parse_var(&lookup, "ORI_RT_TRANSIENT_REGS") {
            config.transient_registers = n;
        }
        if let Some(n) = parse_var(&lookup, "ORI_RT_REGS") {
            config.total_registers = n;
        }
        if let Some(n) = parse_var(&lookup, "ORI_RT_MAX_NESTING") {
            config.max_nesting = (n != 0).then_some(n);
        }
        config.normalized()
    }

    #[must_use]
    pub fn with_transient_registers(mut self, n: usize) -> Self {
        self.transient_registers = n;
        self.normalized()
    }

    #[must_use]
    pub fn with_total_registers(mut self, n: usize) -> Self {
        self.total_registers = n;
        self.normalized()
    }

    #[must_use]
    pub fn with_max_nesting(mut self, max: Option<usize>) -> Self {
        self.max_nesting = max;
        self
    }

    /// At least one transient register, and never more transient registers
    /// than registers.
    fn normalized(mut self) -> Self {
        self.transient_registers = self.transient_registers.max(1);
        self.total_registers = self.total_registers.max(self.transient_registers);
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            transient_registers: Self::DEFAULT_TRANSIENT_REGISTERS,
            total_registers: Self::DEFAULT_TOTAL_REGISTERS,
            max_nesting: Some(Self::DEFAULT_MAX_NESTING),
        }
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable machine setting");
            None
        }
    }
}
