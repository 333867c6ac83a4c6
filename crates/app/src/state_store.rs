//! In-memory snapshot of the latest value per channel.

use std::sync::{Mutex, MutexGuard, PoisonError};

use telerelay_domain::channel::{Category, Channel};
use telerelay_domain::registry::ChannelRegistry;
use telerelay_domain::switch::SwitchState;
use telerelay_domain::update::{GroupValues, StateUpdate};

/// Value held by one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    /// Last message body of a telemetry channel, unparsed.
    Text(String),
    /// Current state of a switch.
    Switch(SwitchState),
}

impl SlotValue {
    /// Value of a slot that was never written.
    #[must_use]
    pub fn default_for(category: Category) -> Self {
        match category {
            Category::Switch => Self::Switch(SwitchState::Off),
            _ => Self::Text(String::new()),
        }
    }
}

#[derive(Debug)]
struct Slots {
    switch: Vec<SwitchState>,
    sensor: Vec<String>,
    health: Vec<String>,
    water: Vec<String>,
}

impl Slots {
    fn text(&self, category: Category) -> Option<&Vec<String>> {
        match category {
            Category::Sensor => Some(&self.sensor),
            Category::Health => Some(&self.health),
            Category::Water => Some(&self.water),
            Category::Switch => None,
        }
    }

    fn text_mut(&mut self, category: Category) -> Option<&mut Vec<String>> {
        match category {
            Category::Sensor => Some(&mut self.sensor),
            Category::Health => Some(&mut self.health),
            Category::Water => Some(&mut self.water),
            Category::Switch => None,
        }
    }

    fn group(&self, category: Category) -> GroupValues {
        let entries = self
            .text(category)
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(index, value)| (Channel::new(category, index).wire_name(), value.clone()))
            .collect();
        GroupValues::new(entries)
    }
}

/// Latest value of every channel in the registry.
///
/// A single lock guards all slots; every read and write is atomic per slot
/// and a snapshot is taken under one acquisition.
pub struct StateStore {
    slots: Mutex<Slots>,
}

impl StateStore {
    /// Create a store with every slot at its default: empty text for
    /// telemetry, [`SwitchState::Off`] for switches.
    #[must_use]
    pub fn new(registry: &ChannelRegistry) -> Self {
        let text = |category| vec![String::new(); registry.count(category)];
        let slots = Slots {
            switch: vec![SwitchState::Off; registry.count(Category::Switch)],
            sensor: text(Category::Sensor),
            health: text(Category::Health),
            water: text(Category::Water),
        };
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Current value of a channel. Unknown channels read as their default.
    #[must_use]
    pub fn get(&self, channel: Channel) -> SlotValue {
        let slots = self.lock();
        let value = match channel.category {
            Category::Switch => slots
                .switch
                .get(channel.index)
                .map(|state| SlotValue::Switch(*state)),
            category => slots
                .text(category)
                .and_then(|texts| texts.get(channel.index))
                .map(|text| SlotValue::Text(text.clone())),
        };
        value.unwrap_or_else(|| SlotValue::default_for(channel.category))
    }

    /// Overwrite a slot.
    ///
    /// Returns `false`, leaving the store untouched, when the channel is not
    /// in the registry or the value kind does not match the category.
    pub fn set(&self, channel: Channel, value: SlotValue) -> bool {
        let mut slots = self.lock();
        let slot_written = match (channel.category, value) {
            (Category::Switch, SlotValue::Switch(state)) => {
                slots.switch.get_mut(channel.index).map(|slot| *slot = state)
            }
            (Category::Switch, SlotValue::Text(_)) | (_, SlotValue::Switch(_)) => None,
            (category, SlotValue::Text(text)) => slots
                .text_mut(category)
                .and_then(|texts| texts.get_mut(channel.index))
                .map(|slot| *slot = text),
        };
        slot_written.is_some()
    }

    /// Every group, read under one lock acquisition.
    #[must_use]
    pub fn snapshot(&self) -> StateUpdate {
        let slots = self.lock();
        StateUpdate {
            button_states: Some(slots.switch.clone()),
            sensor_data: Some(slots.group(Category::Sensor)),
            health_data: Some(slots.group(Category::Health)),
            water_data: Some(slots.group(Category::Water)),
        }
    }

    /// Only the given group.
    #[must_use]
    pub fn group_snapshot(&self, category: Category) -> StateUpdate {
        let slots = self.lock();
        let mut update = StateUpdate::default();
        match update.group_mut(category) {
            Some(group) => *group = Some(slots.group(category)),
            None => update.button_states = Some(slots.switch.clone()),
        }
        update
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
