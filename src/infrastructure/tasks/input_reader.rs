//! Blocking reader thread for host input
//!
//! Standard input cannot be awaited on the executor, so a plain thread reads
//! lines and hands them over through the host event channel.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use futures::executor::block_on;

use crate::infrastructure::types::{HostEvent, HostEventSender};

/// Read `input` line by line on a dedicated thread. `Closed` is sent once
/// the input ends or fails.
pub fn spawn_input_reader<R>(input: R, events: HostEventSender) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("host-input".into())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => block_on(events.send(HostEvent::Line(line))),
                    Err(e) => {
                        log::error!("host: failed to read input: {}", e);
                        break;
                    }
                }
            }
            block_on(events.send(HostEvent::Closed));
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::types::HostEventChannel;
    use embassy_futures::block_on;
    use std::io::Cursor;

    #[test]
    fn forwards_lines_then_closes() {
        let channel: &'static HostEventChannel = Box::leak(Box::new(HostEventChannel::new()));
        let input = Cursor::new("first\nsecond\n");

        let reader = spawn_input_reader(input, channel.sender()).unwrap();
        let receiver = channel.receiver();

        assert_eq!(block_on(receiver.receive()), HostEvent::Line("first".into()));
        assert_eq!(block_on(receiver.receive()), HostEvent::Line("second".into()));
        assert_eq!(block_on(receiver.receive()), HostEvent::Closed);
        reader.join().unwrap();
    }
}
