use embassy_time::{Duration, Timer};

use crate::domain::{
    dto::CommandOutcome,
    entity::{Pixel, PixelStrip},
    ports::{LedError, LedStripPort, LedUsecasesPort},
};

/// Colours shown by the cycle demo, in order
pub const CYCLE_COLORS: [Pixel; 8] = [
    Pixel::from_rgb(255, 0, 0),   // red
    Pixel::from_rgb(0, 255, 0),   // green
    Pixel::from_rgb(0, 0, 255),   // blue
    Pixel::from_rgb(255, 255, 0), // yellow
    Pixel::from_rgb(255, 0, 255), // magenta
    Pixel::from_rgb(0, 255, 255), // cyan
    Pixel::from_rgb(255, 128, 0), // orange
    Pixel::from_rgb(128, 0, 255), // purple
];

/// LED controller operations on top of a buffered strip.
///
/// Every operation validates its whole input before touching the buffer
/// and flushes the strip exactly once.
pub struct LedUsecases<S: LedStripPort> {
    strip: S,
    cycle_step: Duration,
}

impl<S: LedStripPort> LedUsecases<S> {
    pub fn new(strip: S, cycle_step: Duration) -> Self {
        Self { strip, cycle_step }
    }

    fn check_run(&self, start: usize, count: usize) -> Result<(), LedError> {
        let len = self.strip.len();
        match start.checked_add(count) {
            Some(end) if end <= len => Ok(()),
            _ => Err(LedError::RunOutOfRange { start, count, len }),
        }
    }

    fn fill_each(&mut self, pixel: Pixel) -> Result<(), LedError> {
        for index in 0..self.strip.len() {
            self.strip.set_led_color(index, pixel)?;
        }
        Ok(())
    }

    async fn run_cycle(&mut self) -> Result<(), LedError> {
        for color in CYCLE_COLORS {
            self.fill_each(color)?;
            self.strip.update()?;
            Timer::after(self.cycle_step).await;
        }

        self.fill_each(Pixel::BLACK)?;
        self.strip.update()
    }
}

impl<S: LedStripPort> LedUsecasesPort for LedUsecases<S> {
    fn num_pixels(&self) -> usize {
        self.strip.len()
    }

    fn set_pixel(&mut self, index: usize, pixel: Pixel) -> Result<(), LedError> {
        let len = self.strip.len();
        if index >= len {
            return Err(LedError::IndexOutOfRange { index, len });
        }
        self.strip.set_led_color(index, pixel)?;
        self.strip.update()
    }

    fn set_all(&mut self, pixel: Pixel) -> Result<(), LedError> {
        self.strip.fill(pixel);
        self.strip.update()
    }

    fn set_pixels(&mut self, strip: &PixelStrip) -> Result<(), LedError> {
        self.check_run(strip.start_index(), strip.len())?;
        for (offset, pixel) in strip.pixels().iter().enumerate() {
            self.strip.set_led_color(strip.start_index() + offset, *pixel)?;
        }
        self.strip.update()
    }

    fn set_all_pixels(&mut self, pixels: &[Pixel]) -> Result<(), LedError> {
        self.check_run(0, pixels.len())?;
        for (index, pixel) in pixels.iter().enumerate() {
            self.strip.set_led_color(index, *pixel)?;
        }
        self.strip.update()
    }

    fn clear(&mut self) -> Result<(), LedError> {
        self.strip.clear();
        self.strip.update()
    }

    async fn cycle_colors(&mut self) -> CommandOutcome {
        log::debug!("led: starting color cycle");
        match self.run_cycle().await {
            Ok(()) => CommandOutcome::completed(format!(
                "Cycled through {} colors on {} pixels",
                CYCLE_COLORS.len(),
                self.strip.len()
            )),
            Err(e) => {
                log::error!("led: color cycle failed: {}", e);
                CommandOutcome::error(e.to_string())
            }
        }
    }
}
