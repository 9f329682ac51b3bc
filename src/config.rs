use core::fmt;

use embassy_time::Duration;
use neopixel_spi::{ColorOrder, spi_clock_hz};
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::{Map, Value};

pub const MODEL_NAMESPACE: &str = "ianwhalen";
pub const MODEL_FAMILY: &str = "neopixel_pi5";
pub const MODEL_NAME: &str = "neopixel_pi5";

pub const DEFAULT_COMPONENT_NAME: &str = "neopixel";
pub const DEFAULT_NUM_PIXELS: usize = 64;
pub const MAX_NUM_PIXELS: usize = 1024;
pub const DEFAULT_SPI_DEVICE: &str = "/dev/spidev0.0";
pub const DEFAULT_FREQUENCY_KHZ: u32 = 800;
pub const DEFAULT_CYCLE_STEP_MS: u64 = 500;

/// Environment variable holding the path of the component config file
pub const CONFIG_PATH_ENV: &str = "NEOPIXEL_CONFIG";
/// When set, frames go to an in-memory strip instead of spidev
pub const DRY_RUN_ENV: &str = "NEOPIXEL_DRY_RUN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Attributes could not be decoded
    Malformed(String),
    NumPixelsOutOfRange(usize),
    ZeroFrequency,
    EmptySpiDevice,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Malformed(e) => write!(f, "invalid attributes: {}", e),
            ConfigError::NumPixelsOutOfRange(n) => write!(
                f,
                "num_pixels must be between 1 and {}, got {}",
                MAX_NUM_PIXELS, n
            ),
            ConfigError::ZeroFrequency => write!(f, "frequency must be greater than 0"),
            ConfigError::EmptySpiDevice => write!(f, "spi_device must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resource configuration as handed over by the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ComponentConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            model: None,
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    /// Decode and check the strip attributes
    pub fn led_config(&self) -> Result<LedConfig, ConfigError> {
        let config = LedConfig::deserialize(Value::Object(self.attributes.clone()))
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COMPONENT_NAME)
    }
}

/// Strip settings carried in the component attributes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedConfig {
    #[serde(deserialize_with = "integral")]
    pub num_pixels: usize,
    pub spi_device: String,
    /// Bus clock in kHz
    #[serde(deserialize_with = "integral")]
    pub frequency: u32,
    #[serde(deserialize_with = "color_order")]
    pub color_order: ColorOrder,
    #[serde(deserialize_with = "integral")]
    pub cycle_step_ms: u64,
}

impl LedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_pixels == 0 || self.num_pixels > MAX_NUM_PIXELS {
            return Err(ConfigError::NumPixelsOutOfRange(self.num_pixels));
        }
        if self.frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if self.spi_device.trim().is_empty() {
            return Err(ConfigError::EmptySpiDevice);
        }
        Ok(())
    }

    /// SPI clock for a data rate of `frequency` kHz. Every data bit takes
    /// one SPI byte, so the bus runs eight times faster.
    pub fn bus_hz(&self) -> u32 {
        spi_clock_hz(self.frequency.saturating_mul(1000))
    }

    pub fn cycle_step(&self) -> Duration {
        Duration::from_millis(self.cycle_step_ms)
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            num_pixels: DEFAULT_NUM_PIXELS,
            spi_device: DEFAULT_SPI_DEVICE.to_owned(),
            frequency: DEFAULT_FREQUENCY_KHZ,
            color_order: ColorOrder::Grb,
            cycle_step_ms: DEFAULT_CYCLE_STEP_MS,
        }
    }
}

/// Accepts integers as well as floats without a fractional part,
/// since the host transports every number as a double.
fn integral<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Value::deserialize(deserializer)?;
    let number = value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
        .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, got {}", value)))?;
    T::try_from(number).map_err(|_| D::Error::custom(format!("{} is too large", number)))
}

fn color_order<'de, D>(deserializer: D) -> Result<ColorOrder, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    ColorOrder::parse_from_str(&raw)
        .ok_or_else(|| D::Error::custom(format!("unknown color_order '{}'", raw)))
}
