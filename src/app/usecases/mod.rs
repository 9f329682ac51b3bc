mod led;

pub use led::{CYCLE_COLORS, LedUsecases};
