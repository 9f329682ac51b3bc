use serde_json::{Map, Value};

use crate::domain::entity::{Pixel, PixelStrip};

/// Validated strip command.
///
/// This is the transport-neutral form of what a caller asked for,
/// independent of how the request reached the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedCommand {
    SetPixel { index: usize, pixel: Pixel },
    SetAll { pixel: Pixel },
    SetPixels { strip: PixelStrip },
    /// Whole strip contents, starting at index 0
    SetMatrix { pixels: Vec<Pixel> },
    Clear,
    Cycle,
}

impl LedCommand {
    pub const fn action(&self) -> &'static str {
        match self {
            LedCommand::SetPixel { .. } => "set_pixel",
            LedCommand::SetAll { .. } => "set_all",
            LedCommand::SetPixels { .. } => "set_pixels",
            LedCommand::SetMatrix { .. } => "set_matrix",
            LedCommand::Clear => "clear",
            LedCommand::Cycle => "cycle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    Error,
}

impl CommandStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandStatus::Completed => "completed",
            CommandStatus::Error => "error",
        }
    }
}

/// Result reported back to the caller of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: CommandStatus,
    pub message: String,
}

impl CommandOutcome {
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Completed,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Error,
            message: message.into(),
        }
    }

    /// `{"status": ..., "message": ...}` as returned to the host
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("status".into(), Value::from(self.status.as_str()));
        map.insert("message".into(), Value::from(self.message));
        map
    }
}
