mod usecases;

pub use usecases::{CYCLE_COLORS, LedUsecases};
