//! Host Runtime
//!
//! Feeds request lines coming from the host into a component and writes one
//! reply line per request. Malformed requests get an error reply, they never
//! stop the runtime.

use std::io::{self, Write};

use embassy_sync::channel::Channel;

use crate::{
    controllers::handle_request_line,
    domain::ports::GenericComponent,
    infrastructure::types::{HostEvent, HostEventChannel, HostEventReceiver, HostEventSender},
};

static HOST_EVENT_CHANNEL: HostEventChannel = Channel::new();

pub fn host_event_sender() -> HostEventSender {
    HOST_EVENT_CHANNEL.sender()
}

pub fn host_event_receiver() -> HostEventReceiver {
    HOST_EVENT_CHANNEL.receiver()
}

/// Serve host requests until the input closes
pub async fn host_runtime<C, W>(
    component: &mut C,
    events: HostEventReceiver,
    mut output: W,
) -> io::Result<()>
where
    C: GenericComponent,
    W: Write,
{
    log::info!("host: serving component '{}'", component.name());
    loop {
        match events.receive().await {
            HostEvent::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let reply = handle_request_line(component, &line).await;
                writeln!(output, "{}", reply)?;
                output.flush()?;
            }
            HostEvent::Closed => {
                log::info!("host: input closed");
                return Ok(());
            }
        }
    }
}
