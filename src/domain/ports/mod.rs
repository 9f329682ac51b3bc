pub mod component;
pub mod led;

pub use component::{ComponentError, Dependencies, GenericComponent};
pub use led::{LedError, LedStripPort, LedUsecasesPort, StripFactory};
