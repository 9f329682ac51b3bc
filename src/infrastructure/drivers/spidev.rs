//! Linux spidev backend
//!
//! Opens `/dev/spidevX.Y`, sets the bus clock and wraps it in the
//! NeoPixel SPI driver.

use linux_embedded_hal::SpidevBus;
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use neopixel_spi::NeopixelStrip;

use crate::{
    config::LedConfig,
    domain::ports::{LedError, StripFactory},
};

pub type SpidevStrip = NeopixelStrip<SpidevBus>;

/// Open and configure the strip described by `config`
pub fn open_spidev_strip(config: &LedConfig) -> Result<SpidevStrip, LedError> {
    let mut spi = Spidev::open(&config.spi_device)
        .map_err(|e| LedError::Open(format!("{}: {}", config.spi_device, e)))?;

    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(config.bus_hz())
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)
        .map_err(|e| LedError::Open(format!("{}: {}", config.spi_device, e)))?;

    log::debug!(
        "led: opened {} at {} Hz, {} order",
        config.spi_device,
        config.bus_hz(),
        config.color_order.as_str()
    );

    Ok(NeopixelStrip::new(
        SpidevBus(spi),
        config.num_pixels,
        config.color_order,
        config.bus_hz(),
    ))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SpidevStripFactory;

impl StripFactory for SpidevStripFactory {
    type Strip = SpidevStrip;

    fn open(&mut self, config: &LedConfig) -> Result<SpidevStrip, LedError> {
        open_spidev_strip(config)
    }
}
