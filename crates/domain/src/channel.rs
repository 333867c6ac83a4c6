//! Channels: one addressable logical data point.

use serde::{Deserialize, Serialize};

/// The group a channel belongs to.
///
/// Each category maps to one key of the live-update payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sensor,
    Health,
    Water,
    Switch,
}

impl Category {
    /// All categories, in payload order.
    pub const ALL: [Self; 4] = [Self::Switch, Self::Sensor, Self::Health, Self::Water];

    /// Prefix of the 1-based slot names inside the group (`sensor1`, `value1`, …).
    #[must_use]
    pub fn slot_prefix(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Health => "value",
            Self::Water => "water",
            Self::Switch => "switch",
        }
    }

    /// Key of this group in the live-update payload.
    #[must_use]
    pub fn group_key(self) -> &'static str {
        match self {
            Self::Sensor => "sensorData",
            Self::Health => "healthData",
            Self::Water => "waterData",
            Self::Switch => "buttonStates",
        }
    }

    /// Whether the category carries broker telemetry (everything but switches).
    #[must_use]
    pub fn is_telemetry(self) -> bool {
        !matches!(self, Self::Switch)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sensor => f.write_str("sensor"),
            Self::Health => f.write_str("health"),
            Self::Water => f.write_str("water"),
            Self::Switch => f.write_str("switch"),
        }
    }
}

/// Identity of one slot: a category plus a 0-based index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    pub category: Category,
    pub index: usize,
}

impl Channel {
    #[must_use]
    pub fn new(category: Category, index: usize) -> Self {
        Self { category, index }
    }

    /// The 1-based name used on the wire, e.g. `sensor3` or `value1`.
    #[must_use]
    pub fn wire_name(&self) -> String {
        format!("{}{}", self.category.slot_prefix(), self.index + 1)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wire_name())
    }
}
