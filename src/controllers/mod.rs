mod component;
mod host;

pub use component::{CommandError, NeopixelComponent, model_triplet, parse_command};
pub use host::{HostRequest, handle_request, handle_request_line};
