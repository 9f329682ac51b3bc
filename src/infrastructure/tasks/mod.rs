pub mod host_runtime;
pub mod input_reader;

pub use host_runtime::{host_event_receiver, host_event_sender, host_runtime};
pub use input_reader::spawn_input_reader;
