//! Switch state and its three string encodings.
//!
//! | Encoding | `On`     | `Off`     | Used by                                  |
//! |----------|----------|-----------|------------------------------------------|
//! | command  | `"on"`   | `"off"`   | `POST /action/{index}/{state}`           |
//! | wire     | `"true"` | `"false"` | broker payload and `buttonStates` entries |
//! | label    | `"On"`   | `"Off"`   | command endpoint response `message`      |

use crate::error::CommandError;

/// Binary state of one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    On,
    #[default]
    Off,
}

impl SwitchState {
    /// Parse a command literal. Only the exact lowercase `on` / `off` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidState`] for anything else.
    pub fn from_command(value: &str) -> Result<Self, CommandError> {
        match value {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(CommandError::InvalidState {
                state: other.to_string(),
            }),
        }
    }

    /// Value published to the broker and carried in `buttonStates`.
    #[must_use]
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::On => "true",
            Self::Off => "false",
        }
    }

    /// Human label echoed back by the command endpoint.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }
}

impl std::fmt::Display for SwitchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_value())
    }
}
