//! Strip port on top of the SPI NeoPixel driver

use embedded_hal::spi::{Error as _, SpiBus};
use neopixel_spi::NeopixelStrip;

use crate::domain::{
    entity::Pixel,
    ports::{LedError, LedStripPort},
};

impl<B: SpiBus> LedStripPort for NeopixelStrip<B> {
    fn len(&self) -> usize {
        NeopixelStrip::len(self)
    }

    fn set_led_color(&mut self, index: usize, pixel: Pixel) -> Result<(), LedError> {
        if NeopixelStrip::set_led_color(self, index, pixel.into()) {
            Ok(())
        } else {
            Err(LedError::IndexOutOfRange {
                index,
                len: NeopixelStrip::len(self),
            })
        }
    }

    fn fill(&mut self, pixel: Pixel) {
        NeopixelStrip::fill(self, pixel.into());
    }

    fn clear(&mut self) {
        NeopixelStrip::clear(self);
    }

    fn update(&mut self) -> Result<(), LedError> {
        NeopixelStrip::update(self).map_err(|e| {
            log::error!("led: SPI write failed: {:?}", e);
            LedError::Bus(e.kind())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embassy_futures::block_on;
    use embassy_time::Duration;
    use embedded_hal::spi::{ErrorKind, ErrorType};
    use neopixel_spi::encoding::{BYTES_PER_PIXEL, ONE_BIT, ZERO_BIT};
    use neopixel_spi::{ColorOrder, RGB8, reset_len};

    use super::*;
    use crate::app::{CYCLE_COLORS, LedUsecases};
    use crate::config::LedConfig;
    use crate::domain::{dto::CommandStatus, entity::PixelStrip, ports::LedUsecasesPort};

    #[derive(Debug, Default)]
    struct BusLog {
        /// Length of every write, in order
        writes: Vec<usize>,
        flushes: usize,
        /// Last frame written
        frame: Vec<u8>,
    }

    #[derive(Default)]
    struct CountingBus {
        log: Rc<RefCell<BusLog>>,
        fail: bool,
    }

    #[derive(Debug)]
    struct BusFault;

    impl embedded_hal::spi::Error for BusFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Overrun
        }
    }

    impl ErrorType for CountingBus {
        type Error = BusFault;
    }

    impl SpiBus for CountingBus {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), BusFault> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), BusFault> {
            if self.fail {
                return Err(BusFault);
            }
            let mut log = self.log.borrow_mut();
            log.writes.push(words.len());
            log.frame = words.to_vec();
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), BusFault> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), BusFault> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), BusFault> {
            self.log.borrow_mut().flushes += 1;
            Ok(())
        }
    }

    const NUM_PIXELS: usize = 8;
    const RED: Pixel = Pixel::from_rgb(255, 0, 0);

    /// Usecases over a real encoder, clocked like the default config
    fn leds() -> (LedUsecases<NeopixelStrip<CountingBus>>, Rc<RefCell<BusLog>>) {
        let bus = CountingBus::default();
        let log = Rc::clone(&bus.log);
        let config = LedConfig::default();
        let strip = NeopixelStrip::new(bus, NUM_PIXELS, config.color_order, config.bus_hz());
        (LedUsecases::new(strip, Duration::from_millis(0)), log)
    }

    fn frame_len() -> usize {
        NUM_PIXELS * BYTES_PER_PIXEL + reset_len(LedConfig::default().bus_hz())
    }

    fn assert_single_flush(log: &Rc<RefCell<BusLog>>) {
        let log = log.borrow();
        assert_eq!(log.writes, vec![frame_len()]);
        assert_eq!(log.flushes, 1);
    }

    #[test]
    fn set_pixel_reaches_bus_once() {
        let (mut leds, log) = leds();
        leds.set_pixel(3, RED).unwrap();
        assert_single_flush(&log);
    }

    #[test]
    fn set_all_reaches_bus_once() {
        let (mut leds, log) = leds();
        leds.set_all(RED).unwrap();
        assert_single_flush(&log);
        // GRB on the wire: green, red, blue
        let log = log.borrow();
        assert!(log.frame[..8].iter().all(|b| *b == ZERO_BIT));
        assert!(log.frame[8..16].iter().all(|b| *b == ONE_BIT));
        assert!(log.frame[16..24].iter().all(|b| *b == ZERO_BIT));
    }

    #[test]
    fn set_pixels_reaches_bus_once() {
        let (mut leds, log) = leds();
        let lists: [[i64; 3]; 3] = [[1, 2, 3], [4, 5, 6], [7, 8, 9]];
        let run = PixelStrip::from_lists(&lists, 2).unwrap();
        leds.set_pixels(&run).unwrap();
        assert_single_flush(&log);
    }

    #[test]
    fn matrix_reaches_bus_once() {
        let (mut leds, log) = leds();
        leds.set_all_pixels(&[RED; NUM_PIXELS]).unwrap();
        assert_single_flush(&log);
    }

    #[test]
    fn clear_reaches_bus_once() {
        let (mut leds, log) = leds();
        leds.clear().unwrap();
        assert_single_flush(&log);
    }

    #[test]
    fn rejected_run_never_reaches_bus() {
        let (mut leds, log) = leds();
        let run = PixelStrip::new(vec![RED; 3], NUM_PIXELS - 1);
        assert!(leds.set_pixels(&run).is_err());
        assert!(leds.set_pixel(NUM_PIXELS, RED).is_err());

        let log = log.borrow();
        assert!(log.writes.is_empty());
        assert_eq!(log.flushes, 0);
    }

    #[test]
    fn cycle_flushes_once_per_step() {
        let (mut leds, log) = leds();
        let outcome = block_on(leds.cycle_colors());
        assert_eq!(outcome.status, CommandStatus::Completed);

        let log = log.borrow();
        assert_eq!(log.writes, vec![frame_len(); CYCLE_COLORS.len() + 1]);
        assert_eq!(log.flushes, CYCLE_COLORS.len() + 1);
        // Ends dark: every data byte encodes a zero bit
        assert!(
            log.frame[..NUM_PIXELS * BYTES_PER_PIXEL]
                .iter()
                .all(|b| *b == ZERO_BIT)
        );
    }

    #[test]
    fn index_past_end_maps_to_domain_error() {
        let mut strip = NeopixelStrip::new(CountingBus::default(), 2, ColorOrder::Grb, 6_400_000);
        assert_eq!(
            LedStripPort::set_led_color(&mut strip, 5, Pixel::BLACK),
            Err(LedError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(strip.pixels(), &[RGB8::new(0, 0, 0); 2]);
    }

    #[test]
    fn bus_failure_keeps_error_kind() {
        let bus = CountingBus {
            fail: true,
            ..CountingBus::default()
        };
        let mut strip = NeopixelStrip::new(bus, 2, ColorOrder::Grb, 6_400_000);
        assert_eq!(
            LedStripPort::update(&mut strip),
            Err(LedError::Bus(ErrorKind::Overrun))
        );
    }
}
