//! Colour buffer with a single-flush update

use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::spi::SpiBus;
use smart_leds::{RGB8, SmartLedsWrite};

use crate::encoding::{BYTES_PER_PIXEL, ColorOrder, encode_pixel, reset_len};

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// WS2812 strip driven through an SPI bus
///
/// Colour setters only touch the in-memory buffer. Nothing reaches the bus
/// until [`NeopixelStrip::update`] sends the whole frame in one write.
pub struct NeopixelStrip<B> {
    bus: B,
    order: ColorOrder,
    pixels: Vec<RGB8>,
    frame: Vec<u8>,
    reset_len: usize,
}

impl<B: SpiBus> NeopixelStrip<B> {
    /// Create a strip of `num_pixels` black pixels
    ///
    /// # Arguments
    /// * `bus` - SPI bus wired to the strip data line
    /// * `num_pixels` - number of pixels on the strip
    /// * `order` - channel order expected by the pixels
    /// * `bus_hz` - bus clock, used to size the latch tail
    pub fn new(bus: B, num_pixels: usize, order: ColorOrder, bus_hz: u32) -> Self {
        let reset_len = reset_len(bus_hz);
        Self {
            bus,
            order,
            pixels: vec![BLACK; num_pixels],
            frame: Vec::with_capacity(num_pixels * BYTES_PER_PIXEL + reset_len),
            reset_len,
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Current buffer contents
    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    /// Set a buffered pixel. Returns `false` if `index` is past the strip end.
    pub fn set_led_color(&mut self, index: usize, color: RGB8) -> bool {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, color: RGB8) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    /// Encode the buffer and push it to the bus
    pub fn update(&mut self) -> Result<(), B::Error> {
        self.frame.clear();
        for pixel in &self.pixels {
            encode_pixel(*pixel, self.order, &mut self.frame);
        }
        self.frame.resize(self.frame.len() + self.reset_len, 0);

        self.bus.write(&self.frame)?;
        self.bus.flush()
    }

    /// Give the bus back, dropping the buffer
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: SpiBus> SmartLedsWrite for NeopixelStrip<B> {
    type Error = B::Error;
    type Color = RGB8;

    /// Overwrite the buffer from index 0 and update once.
    /// Colours past the strip end are dropped.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for (slot, color) in self.pixels.iter_mut().zip(iterator) {
            *slot = color.into();
        }
        self.update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{ONE_BIT, ZERO_BIT};
    use core::convert::Infallible;
    use embedded_hal::spi::ErrorType;

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl ErrorType for RecordingBus {
        type Error = Infallible;
    }

    impl SpiBus for RecordingBus {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            self.writes.push(words.to_vec());
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.writes.push(write.to_vec());
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn strip(num_pixels: usize) -> NeopixelStrip<RecordingBus> {
        NeopixelStrip::new(RecordingBus::default(), num_pixels, ColorOrder::Grb, 800_000)
    }

    #[test]
    fn starts_black_and_silent() {
        let strip = strip(4);
        assert_eq!(strip.len(), 4);
        assert!(strip.pixels().iter().all(|p| *p == BLACK));

        let bus = strip.release();
        assert!(bus.writes.is_empty());
        assert_eq!(bus.flushes, 0);
    }

    #[test]
    fn setters_do_not_touch_the_bus() {
        let mut strip = strip(3);
        assert!(strip.set_led_color(0, RGB8::new(1, 2, 3)));
        strip.fill(RGB8::new(9, 9, 9));
        strip.clear();

        assert!(strip.release().writes.is_empty());
    }

    #[test]
    fn out_of_range_index_is_refused() {
        let mut strip = strip(2);
        assert!(!strip.set_led_color(2, RGB8::new(255, 0, 0)));
        assert!(strip.pixels().iter().all(|p| *p == BLACK));
    }

    #[test]
    fn update_sends_one_frame() {
        let mut strip = strip(2);
        strip.set_led_color(1, RGB8::new(0, 255, 0));
        strip.update().unwrap();

        let bus = strip.release();
        assert_eq!(bus.writes.len(), 1);
        assert_eq!(bus.flushes, 1);

        let frame = &bus.writes[0];
        assert_eq!(frame.len(), 2 * BYTES_PER_PIXEL + reset_len(800_000));
        assert!(frame[..BYTES_PER_PIXEL].iter().all(|b| *b == ZERO_BIT));
        // Second pixel, green channel first on the wire
        assert!(frame[BYTES_PER_PIXEL..BYTES_PER_PIXEL + 8].iter().all(|b| *b == ONE_BIT));
        assert!(frame[2 * BYTES_PER_PIXEL..].iter().all(|b| *b == 0));
    }

    #[test]
    fn repeated_updates_reuse_frame_length() {
        let mut strip = strip(3);
        strip.update().unwrap();
        strip.fill(RGB8::new(255, 255, 255));
        strip.update().unwrap();

        let bus = strip.release();
        assert_eq!(bus.writes.len(), 2);
        assert_eq!(bus.writes[0].len(), bus.writes[1].len());
    }

    #[test]
    fn smart_leds_write_fills_from_start() {
        let mut strip = strip(2);
        let colors = [RGB8::new(1, 1, 1), RGB8::new(2, 2, 2), RGB8::new(3, 3, 3)];
        SmartLedsWrite::write(&mut strip, colors.iter().copied()).unwrap();

        assert_eq!(strip.pixels(), &colors[..2]);
        assert_eq!(strip.release().flushes, 1);
    }
}
