use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

/// Input from the host side of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// One request line
    Line(String),
    /// Input stream ended
    Closed,
}

pub(crate) const HOST_EVENT_CHANNEL_SIZE: usize = 4;

pub type HostEventChannel = Channel<CriticalSectionRawMutex, HostEvent, HOST_EVENT_CHANNEL_SIZE>;

pub type HostEventSender =
    Sender<'static, CriticalSectionRawMutex, HostEvent, HOST_EVENT_CHANNEL_SIZE>;

pub type HostEventReceiver =
    Receiver<'static, CriticalSectionRawMutex, HostEvent, HOST_EVENT_CHANNEL_SIZE>;
