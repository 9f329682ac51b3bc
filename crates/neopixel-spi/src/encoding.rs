//! WS2812 bit expansion
//!
//! Every data bit is sent as one SPI byte. A long high pulse (`0xF8`) encodes
//! a `1`, a short one (`0xC0`) encodes a `0`. Bits go out MSB first.

use alloc::vec::Vec;

use smart_leds::RGB8;

/// SPI byte for a `1` data bit
pub const ONE_BIT: u8 = 0xF8;
/// SPI byte for a `0` data bit
pub const ZERO_BIT: u8 = 0xC0;
/// SPI bytes needed for a single pixel
pub const BYTES_PER_PIXEL: usize = 24;
/// Bus clocks spent on one data bit
pub const SPI_CLOCKS_PER_BIT: u32 = 8;

/// Latch time the line has to stay low after a frame, in microseconds
const RESET_MICROS: u64 = 80;

/// Channel order on the wire
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrder {
    /// WS2812B native order
    #[default]
    Grb,
    Rgb,
    Brg,
}

impl ColorOrder {
    /// Channel bytes in transmission order
    pub const fn arrange(self, color: RGB8) -> [u8; 3] {
        match self {
            ColorOrder::Grb => [color.g, color.r, color.b],
            ColorOrder::Rgb => [color.r, color.g, color.b],
            ColorOrder::Brg => [color.b, color.r, color.g],
        }
    }

    pub fn parse_from_str(value: &str) -> Option<Self> {
        match value {
            "grb" | "GRB" => Some(ColorOrder::Grb),
            "rgb" | "RGB" => Some(ColorOrder::Rgb),
            "brg" | "BRG" => Some(ColorOrder::Brg),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ColorOrder::Grb => "grb",
            ColorOrder::Rgb => "rgb",
            ColorOrder::Brg => "brg",
        }
    }
}

/// Expand one colour byte into eight SPI bytes
pub const fn expand_byte(byte: u8) -> [u8; 8] {
    let mut out = [ZERO_BIT; 8];
    let mut i = 0;
    while i < 8 {
        if byte & (0x80 >> i) != 0 {
            out[i] = ONE_BIT;
        }
        i += 1;
    }
    out
}

/// Append the wire representation of `color` to `frame`
pub fn encode_pixel(color: RGB8, order: ColorOrder, frame: &mut Vec<u8>) {
    for channel in order.arrange(color) {
        frame.extend_from_slice(&expand_byte(channel));
    }
}

/// Bus clock that sends `data_rate_hz` WS2812 bits per second
pub const fn spi_clock_hz(data_rate_hz: u32) -> u32 {
    data_rate_hz.saturating_mul(SPI_CLOCKS_PER_BIT)
}

/// Number of zero bytes that keep the line low long enough to latch
/// at the given bus clock. Never less than one byte.
pub const fn reset_len(bus_hz: u32) -> usize {
    let bits = RESET_MICROS * bus_hz as u64 / 1_000_000;
    let bytes = bits.div_ceil(8) as usize;
    if bytes == 0 { 1 } else { bytes }
}
