use core::fmt;

use embedded_hal::spi::ErrorKind;

use crate::{
    config::LedConfig,
    domain::{
        dto::CommandOutcome,
        entity::{Pixel, PixelStrip},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedError {
    /// Single index past the end of the strip
    IndexOutOfRange { index: usize, len: usize },
    /// Run of pixels that does not fit on the strip
    RunOutOfRange {
        start: usize,
        count: usize,
        len: usize,
    },
    /// Bus rejected the frame
    Bus(ErrorKind),
    /// Strip device could not be opened
    Open(String),
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedError::IndexOutOfRange { index, len } => write!(
                f,
                "pixel index {} is out of range for a strip of {} pixels",
                index, len
            ),
            LedError::RunOutOfRange { start, count, len } => write!(
                f,
                "{} pixels starting at index {} do not fit on a strip of {} pixels",
                count, start, len
            ),
            LedError::Bus(kind) => write!(f, "SPI bus error: {}", kind),
            LedError::Open(e) => write!(f, "failed to open LED strip: {}", e),
        }
    }
}

impl std::error::Error for LedError {}

/// Buffered LED strip.
///
/// Setters only change the buffer, [`LedStripPort::update`] pushes it out.
pub trait LedStripPort {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_led_color(&mut self, index: usize, pixel: Pixel) -> Result<(), LedError>;

    fn fill(&mut self, pixel: Pixel);

    fn clear(&mut self);

    /// Send the buffer to the strip
    fn update(&mut self) -> Result<(), LedError>;
}

/// Opens strips for a given configuration
pub trait StripFactory {
    type Strip: LedStripPort;

    fn open(&mut self, config: &LedConfig) -> Result<Self::Strip, LedError>;
}

/// Port interface for the LED usecases
///
/// Indices or runs that fall outside the strip are an error and nothing is
/// written or flushed, unlike drivers that silently skip such pixels.
#[allow(async_fn_in_trait)]
pub trait LedUsecasesPort {
    fn num_pixels(&self) -> usize;

    /// Set one pixel and flush
    fn set_pixel(&mut self, index: usize, pixel: Pixel) -> Result<(), LedError>;

    /// Set every pixel to the same colour and flush
    fn set_all(&mut self, pixel: Pixel) -> Result<(), LedError>;

    /// Write a run of pixels and flush once
    fn set_pixels(&mut self, strip: &PixelStrip) -> Result<(), LedError>;

    /// Write pixels from index 0 and flush once
    fn set_all_pixels(&mut self, pixels: &[Pixel]) -> Result<(), LedError>;

    fn clear(&mut self) -> Result<(), LedError>;

    /// Run the built-in colour cycle. Failures are reported in the outcome.
    async fn cycle_colors(&mut self) -> CommandOutcome;
}
