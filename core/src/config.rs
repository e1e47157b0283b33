//! config.rs
//! Manager configuration.
//!
//! Everything has a default, so a JSON document only needs the fields it
//! changes:
//!
//! ```json
//! { "size_threshold": 131072, "isa": { "installed": false } }
//! ```
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_OUT_BUFFER_SIZE, DEFAULT_SIZE_THRESHOLD, MAX_ANALYTICS_BINDINGS, MAX_ISA_BINDINGS, MAX_OFFLOAD_BINDINGS,
};
use crate::strategy::{OffloadMode, StrategyType};
use crate::types::{DispatchError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Whether the engine is present on this host.
    pub installed: bool,
    /// Binding pool cap. Unset means the backend's built-in cap; an
    /// explicit 0 leaves the backend with no free slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl BackendConfig {
    pub fn new(installed: bool, capacity: usize) -> Self {
        Self { installed, capacity: Some(capacity) }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { installed: true, capacity: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Strategy bank. The policy may only name these.
    pub strategies: Vec<StrategyType>,
    pub size_threshold: usize,
    pub offload_mode: OffloadMode,
    /// Initial output buffer of an offload session binding.
    pub session_buffer_size: usize,
    pub offload: BackendConfig,
    pub analytics: BackendConfig,
    pub isa: BackendConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            strategies: StrategyType::ALL.to_vec(),
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            offload_mode: OffloadMode::Direct,
            session_buffer_size: DEFAULT_OUT_BUFFER_SIZE,
            offload: BackendConfig::new(true, MAX_OFFLOAD_BINDINGS),
            analytics: BackendConfig::new(true, MAX_ANALYTICS_BINDINGS),
            isa: BackendConfig::new(true, MAX_ISA_BINDINGS),
        }
    }
}

impl ManagerConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: ManagerConfig = serde_json::from_str(s).map_err(|e| DispatchError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Only the software backend.
    pub fn software_only() -> Self {
        Self { strategies: vec![StrategyType::Software], ..Self::default() }
    }

    pub fn with_strategies(mut self, strategies: Vec<StrategyType>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_installed(mut self, strategy: StrategyType, installed: bool) -> Self {
        if let Some(b) = self.backend_mut(strategy) {
            b.installed = installed;
        }
        self
    }

    pub fn with_capacity(mut self, strategy: StrategyType, capacity: usize) -> Self {
        if let Some(b) = self.backend_mut(strategy) {
            b.capacity = Some(capacity);
        }
        self
    }

    pub fn backend(&self, strategy: StrategyType) -> Option<&BackendConfig> {
        match strategy {
            StrategyType::Offload => Some(&self.offload),
            StrategyType::Analytics => Some(&self.analytics),
            StrategyType::Isa => Some(&self.isa),
            StrategyType::Software => None,
        }
    }

    fn backend_mut(&mut self, strategy: StrategyType) -> Option<&mut BackendConfig> {
        match strategy {
            StrategyType::Offload => Some(&mut self.offload),
            StrategyType::Analytics => Some(&mut self.analytics),
            StrategyType::Isa => Some(&mut self.isa),
            StrategyType::Software => None,
        }
    }

    /// Pool cap the manager builds `strategy`'s handler with. Software has
    /// no pool and reports 0.
    pub fn capacity(&self, strategy: StrategyType) -> usize {
        let built_in = match strategy {
            StrategyType::Offload => MAX_OFFLOAD_BINDINGS,
            StrategyType::Analytics => MAX_ANALYTICS_BINDINGS,
            StrategyType::Isa => MAX_ISA_BINDINGS,
            StrategyType::Software => return 0,
        };
        self.backend(strategy).and_then(|b| b.capacity).unwrap_or(built_in)
    }

    pub fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(DispatchError::Config("strategy bank is empty".into()));
        }
        for (i, s) in self.strategies.iter().enumerate() {
            if self.strategies[..i].contains(s) {
                return Err(DispatchError::Config(format!("strategy {s} listed twice")));
            }
        }
        if self.session_buffer_size == 0 {
            return Err(DispatchError::Config("session_buffer_size must be non-zero".into()));
        }
        Ok(())
    }
}
