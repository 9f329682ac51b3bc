use core::fmt;

use serde_json::{Map, Value};

use crate::{
    config::{ComponentConfig, ConfigError},
    domain::ports::led::LedError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    NotInitialized,
    MissingAction,
    Config(ConfigError),
    Led(LedError),
    NotImplemented(&'static str),
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentError::NotInitialized => write!(f, "LED controller not initialized"),
            ComponentError::MissingAction => write!(f, "Command must include 'action' field"),
            ComponentError::Config(e) => write!(f, "{}", e),
            ComponentError::Led(e) => write!(f, "{}", e),
            ComponentError::NotImplemented(method) => write!(f, "`{}` is not implemented", method),
        }
    }
}

impl std::error::Error for ComponentError {}

impl From<ConfigError> for ComponentError {
    fn from(e: ConfigError) -> Self {
        ComponentError::Config(e)
    }
}

impl From<LedError> for ComponentError {
    fn from(e: LedError) -> Self {
        ComponentError::Led(e)
    }
}

/// Dependencies a configuration asks the host to resolve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

/// Lifecycle hooks of a generic component living inside the host.
#[allow(async_fn_in_trait)]
pub trait GenericComponent {
    fn name(&self) -> &str;

    /// Check a configuration before it is applied
    fn validate_config(config: &ComponentConfig) -> Result<Dependencies, ComponentError>
    where
        Self: Sized;

    /// Apply a new configuration in place
    fn reconfigure(&mut self, config: &ComponentConfig) -> Result<(), ComponentError>;

    /// Run a free-form command
    async fn do_command(
        &mut self,
        command: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ComponentError>;

    fn get_geometries(&self) -> Result<Vec<Value>, ComponentError>;
}
