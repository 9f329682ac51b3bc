mod memory;
mod neopixel_strip;
#[cfg(target_os = "linux")]
mod spidev;

pub use memory::{MemoryStrip, MemoryStripFactory, MemoryStripHandle};
#[cfg(target_os = "linux")]
pub use spidev::{SpidevStrip, SpidevStripFactory, open_spidev_strip};
