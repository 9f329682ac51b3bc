//! In-memory strip
//!
//! Keeps every flushed frame instead of driving hardware. Used for dry runs
//! on machines without an SPI bus, and by the tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_hal::spi::ErrorKind;

use crate::{
    config::LedConfig,
    domain::{
        entity::Pixel,
        ports::{LedError, LedStripPort, StripFactory},
    },
};

/// Flushed frames kept per strip, older ones are dropped
pub const FRAME_HISTORY: usize = 16;

#[derive(Debug, Default)]
struct MemoryState {
    pixels: Vec<Pixel>,
    frames: VecDeque<Vec<Pixel>>,
    updates: usize,
    fail_updates: bool,
}

/// Shared view of a [`MemoryStrip`], still valid after the strip moved away
#[derive(Debug, Clone, Default)]
pub struct MemoryStripHandle(Arc<Mutex<MemoryState>>);

impl MemoryStripHandle {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Buffer contents, flushed or not
    pub fn pixels(&self) -> Vec<Pixel> {
        self.lock().pixels.clone()
    }

    /// Up to [`FRAME_HISTORY`] most recent frames, oldest first
    pub fn frames(&self) -> Vec<Vec<Pixel>> {
        self.lock().frames.iter().cloned().collect()
    }

    pub fn last_frame(&self) -> Option<Vec<Pixel>> {
        self.lock().frames.back().cloned()
    }

    /// Updates since the strip was opened, including dropped frames
    pub fn update_count(&self) -> usize {
        self.lock().updates
    }

    /// Make subsequent updates fail like a broken bus
    pub fn set_fail_updates(&self, fail: bool) {
        self.lock().fail_updates = fail;
    }
}

pub struct MemoryStrip {
    state: MemoryStripHandle,
}

impl MemoryStrip {
    pub fn new(num_pixels: usize) -> Self {
        let state = MemoryStripHandle::default();
        state.lock().pixels = vec![Pixel::BLACK; num_pixels];
        Self { state }
    }

    pub fn handle(&self) -> MemoryStripHandle {
        self.state.clone()
    }
}

impl LedStripPort for MemoryStrip {
    fn len(&self) -> usize {
        self.state.lock().pixels.len()
    }

    fn set_led_color(&mut self, index: usize, pixel: Pixel) -> Result<(), LedError> {
        let mut state = self.state.lock();
        let len = state.pixels.len();
        let slot = state
            .pixels
            .get_mut(index)
            .ok_or(LedError::IndexOutOfRange { index, len })?;
        *slot = pixel;
        Ok(())
    }

    fn fill(&mut self, pixel: Pixel) {
        self.state.lock().pixels.fill(pixel);
    }

    fn clear(&mut self) {
        self.fill(Pixel::BLACK);
    }

    fn update(&mut self) -> Result<(), LedError> {
        let mut state = self.state.lock();
        if state.fail_updates {
            return Err(LedError::Bus(ErrorKind::Other));
        }
        if state.frames.len() == FRAME_HISTORY {
            state.frames.pop_front();
        }
        let frame = state.pixels.clone();
        state.frames.push_back(frame);
        state.updates += 1;
        log::trace!("memory: frame {} flushed", state.updates);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    last: Option<(LedConfig, MemoryStripHandle)>,
    opened: usize,
    fail_open: Option<String>,
}

/// Opens [`MemoryStrip`]s and keeps a handle to the latest one
#[derive(Debug, Clone, Default)]
pub struct MemoryStripFactory(Arc<Mutex<FactoryState>>);

impl MemoryStripFactory {
    fn lock(&self) -> MutexGuard<'_, FactoryState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refuse further `open` calls with the given reason, or accept them again
    pub fn set_fail_open(&self, reason: Option<&str>) {
        self.lock().fail_open = reason.map(str::to_owned);
    }

    pub fn open_count(&self) -> usize {
        self.lock().opened
    }

    /// Most recently opened strip
    pub fn last_strip(&self) -> Option<MemoryStripHandle> {
        self.lock().last.as_ref().map(|(_, handle)| handle.clone())
    }

    pub fn last_config(&self) -> Option<LedConfig> {
        self.lock().last.as_ref().map(|(config, _)| config.clone())
    }
}

impl StripFactory for MemoryStripFactory {
    type Strip = MemoryStrip;

    fn open(&mut self, config: &LedConfig) -> Result<MemoryStrip, LedError> {
        let mut state = self.lock();
        if let Some(reason) = &state.fail_open {
            return Err(LedError::Open(reason.clone()));
        }

        let strip = MemoryStrip::new(config.num_pixels);
        state.last = Some((config.clone(), strip.handle()));
        state.opened += 1;
        log::debug!(
            "memory: opened strip #{} with {} pixels",
            state.opened,
            config.num_pixels
        );
        Ok(strip)
    }
}
