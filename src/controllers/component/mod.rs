//! NeoPixel generic component
//!
//! Owns the strip factory and the LED usecases, and turns free-form host
//! commands into usecase calls.

mod command;

use serde_json::{Map, Value};

pub use command::{CommandError, parse_command};

use crate::{
    app::LedUsecases,
    config::{ComponentConfig, MODEL_FAMILY, MODEL_NAME, MODEL_NAMESPACE},
    domain::{
        dto::{CommandOutcome, LedCommand},
        ports::{ComponentError, Dependencies, GenericComponent, LedUsecasesPort, StripFactory},
    },
};

/// `namespace:family:name` triple the host registers the component under
pub fn model_triplet() -> String {
    format!("{}:{}:{}", MODEL_NAMESPACE, MODEL_FAMILY, MODEL_NAME)
}

pub struct NeopixelComponent<F: StripFactory> {
    name: String,
    factory: F,
    usecases: Option<LedUsecases<F::Strip>>,
}

impl<F: StripFactory> NeopixelComponent<F> {
    /// Component with no strip yet. Commands fail until a successful
    /// [`GenericComponent::reconfigure`].
    pub fn with_factory(name: &str, factory: F) -> Self {
        Self {
            name: name.to_owned(),
            factory,
            usecases: None,
        }
    }

    /// Build and configure in one go
    pub fn new(config: &ComponentConfig, factory: F) -> Result<Self, ComponentError> {
        let mut component = Self::with_factory(&config.name, factory);
        component.reconfigure(config)?;
        Ok(component)
    }

    pub fn is_initialized(&self) -> bool {
        self.usecases.is_some()
    }

    pub fn num_pixels(&self) -> Option<usize> {
        self.usecases.as_ref().map(LedUsecasesPort::num_pixels)
    }

    async fn execute(usecases: &mut LedUsecases<F::Strip>, command: LedCommand) -> CommandOutcome {
        log::debug!("component: running `{}`", command.action());
        let result = match command {
            LedCommand::SetPixel { index, pixel } => usecases.set_pixel(index, pixel).map(|()| {
                format!("Set pixel {} to {}", index, pixel)
            }),
            LedCommand::SetAll { pixel } => usecases
                .set_all(pixel)
                .map(|()| format!("Set all pixels to {}", pixel)),
            LedCommand::SetPixels { strip } => usecases.set_pixels(&strip).map(|()| {
                format!(
                    "Set {} pixels starting at index {}",
                    strip.len(),
                    strip.start_index()
                )
            }),
            LedCommand::SetMatrix { pixels } => usecases
                .set_all_pixels(&pixels)
                .map(|()| format!("Set all {} pixels from matrix", pixels.len())),
            LedCommand::Clear => usecases.clear().map(|()| "Cleared all pixels".to_owned()),
            LedCommand::Cycle => return usecases.cycle_colors().await,
        };

        match result {
            Ok(message) => CommandOutcome::completed(message),
            Err(e) => {
                log::error!("component: command failed: {}", e);
                CommandOutcome::error(e.to_string())
            }
        }
    }
}

impl<F: StripFactory> GenericComponent for NeopixelComponent<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate_config(config: &ComponentConfig) -> Result<Dependencies, ComponentError> {
        config.led_config()?;
        Ok(Dependencies::default())
    }

    fn reconfigure(&mut self, config: &ComponentConfig) -> Result<(), ComponentError> {
        let led_config = config.led_config().inspect_err(|e| {
            log::error!("component: failed to initialize LED controller: {}", e);
        })?;

        let strip = self.factory.open(&led_config).inspect_err(|e| {
            log::error!("component: failed to initialize LED controller: {}", e);
        })?;

        self.name.clone_from(&config.name);
        self.usecases = Some(LedUsecases::new(strip, led_config.cycle_step()));
        log::info!(
            "component: LED controller initialized with {} pixels",
            led_config.num_pixels
        );
        Ok(())
    }

    async fn do_command(
        &mut self,
        command: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ComponentError> {
        log::info!("component: received command: {}", Value::Object(command.clone()));

        let usecases = self.usecases.as_mut().ok_or(ComponentError::NotInitialized)?;

        let outcome = match parse_command(command) {
            Ok(command) => Self::execute(usecases, command).await,
            Err(CommandError::MissingAction) => return Err(ComponentError::MissingAction),
            Err(e) => {
                log::warn!("component: rejected command: {}", e);
                CommandOutcome::error(e.to_string())
            }
        };
        Ok(outcome.into_map())
    }

    fn get_geometries(&self) -> Result<Vec<Value>, ComponentError> {
        log::error!("component: `get_geometries` is not implemented");
        Err(ComponentError::NotImplemented("get_geometries"))
    }
}
