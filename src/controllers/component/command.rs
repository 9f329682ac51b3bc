//! Free-form command map to [`LedCommand`]

use core::fmt;

use serde_json::{Map, Value};

use crate::domain::{
    dto::LedCommand,
    entity::{Pixel, PixelError, PixelStrip},
};

pub(crate) const ACTION_FIELD: &str = "action";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    MissingAction,
    UnknownAction(String),
    /// Field present but not usable
    InvalidField { field: String, reason: String },
    MissingPixels,
    MissingMatrix,
    Pixel(PixelError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::MissingAction => write!(f, "Command must include 'action' field"),
            CommandError::UnknownAction(action) => {
                write!(f, "Action '{}' is not implemented", action)
            }
            CommandError::InvalidField { field, reason } => write!(f, "{} {}", field, reason),
            CommandError::MissingPixels => {
                write!(f, "pixels parameter is required for set_pixels action")
            }
            CommandError::MissingMatrix => {
                write!(f, "matrix parameter is required for set_matrix action")
            }
            CommandError::Pixel(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<PixelError> for CommandError {
    fn from(e: PixelError) -> Self {
        CommandError::Pixel(e)
    }
}

/// Parse and validate a command map
pub fn parse_command(command: &Map<String, Value>) -> Result<LedCommand, CommandError> {
    let action = command.get(ACTION_FIELD).ok_or(CommandError::MissingAction)?;
    let action = match action {
        Value::String(action) => action.as_str(),
        _ => return Err(CommandError::UnknownAction(action.to_string())),
    };

    match action {
        "set_pixel" => Ok(LedCommand::SetPixel {
            index: index_field(command, "pixel")?,
            pixel: rgb_fields(command)?,
        }),
        "set_all" => Ok(LedCommand::SetAll {
            pixel: rgb_fields(command)?,
        }),
        "set_pixels" => {
            let lists = color_lists(command, "pixels")?;
            if lists.is_empty() {
                return Err(CommandError::MissingPixels);
            }
            let start = integer_field(command, "start", 0)?;
            Ok(LedCommand::SetPixels {
                strip: PixelStrip::from_lists(&lists, start)?,
            })
        }
        "set_matrix" => {
            let lists = color_lists(command, "matrix")?;
            if lists.is_empty() {
                return Err(CommandError::MissingMatrix);
            }
            let pixels = lists
                .iter()
                .map(|list| Pixel::from_list(list))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LedCommand::SetMatrix { pixels })
        }
        "clear" => Ok(LedCommand::Clear),
        "cycle" => Ok(LedCommand::Cycle),
        other => Err(CommandError::UnknownAction(other.to_owned())),
    }
}

/// Integer view of a JSON number. Doubles are accepted when integral.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn integer_field(command: &Map<String, Value>, field: &str, default: i64) -> Result<i64, CommandError> {
    match command.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => as_integer(value).ok_or_else(|| CommandError::InvalidField {
            field: field.to_owned(),
            reason: format!("must be an integer, got {}", value),
        }),
    }
}

fn index_field(command: &Map<String, Value>, field: &str) -> Result<usize, CommandError> {
    let index = integer_field(command, field, 0)?;
    usize::try_from(index).map_err(|_| CommandError::InvalidField {
        field: field.to_owned(),
        reason: format!("must be non-negative, got {}", index),
    })
}

fn rgb_fields(command: &Map<String, Value>) -> Result<Pixel, CommandError> {
    Ok(Pixel::new(
        integer_field(command, "red", 0)?,
        integer_field(command, "green", 0)?,
        integer_field(command, "blue", 0)?,
    )?)
}

/// `[[r, g, b], ...]`; a missing field reads as empty
fn color_lists(command: &Map<String, Value>, field: &str) -> Result<Vec<Vec<i64>>, CommandError> {
    let invalid = |reason: String| CommandError::InvalidField {
        field: field.to_owned(),
        reason,
    };

    let entries = match command.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => return Err(invalid(format!("must be a list, got {}", other))),
    };

    entries
        .iter()
        .map(|entry| {
            let channels = entry
                .as_array()
                .ok_or_else(|| invalid(format!("entries must be [r, g, b] lists, got {}", entry)))?;
            channels
                .iter()
                .map(|c| as_integer(c).ok_or_else(|| invalid(format!("values must be integers, got {}", c))))
                .collect()
        })
        .collect()
}
