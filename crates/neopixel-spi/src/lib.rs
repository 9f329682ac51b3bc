#![no_std]

//! WS2812 (NeoPixel) strip driver over an SPI bus
//!
//! Architecture layers:
//! - `encoding` - bit expansion of colours into SPI bytes
//! - `strip` - colour buffer and the single-flush [`NeopixelStrip`]
//!
//! The strip is generic over [`embedded_hal::spi::SpiBus`], so any bus
//! implementation (Linux spidev, MCU peripheral, test recorder) can drive it.

extern crate alloc;

pub mod encoding;
pub mod strip;

pub use encoding::{ColorOrder, reset_len, spi_clock_hz};
pub use strip::NeopixelStrip;

pub use smart_leds::RGB8;
