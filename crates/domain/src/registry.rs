//! Channel registry: the fixed mapping between broker topics and slots.
//!
//! A [`ChannelRegistry`] is built once from a [`TopicTable`] and never
//! changes afterwards. Construction fails if any topic string is claimed by
//! more than one slot, so a topic always resolves to at most one channel.

use std::collections::HashMap;

use serde::Deserialize;

use crate::channel::{Category, Channel};
use crate::error::RegistryError;

/// Ordered topic lists, one per category. Position `i` in a list is the
/// topic of the slot with index `i`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TopicTable {
    pub sensor: Vec<String>,
    pub health: Vec<String>,
    pub water: Vec<String>,
    pub switch: Vec<String>,
}

impl TopicTable {
    /// The topics of one category.
    #[must_use]
    pub fn topics(&self, category: Category) -> &[String] {
        match category {
            Category::Sensor => &self.sensor,
            Category::Health => &self.health,
            Category::Water => &self.water,
            Category::Switch => &self.switch,
        }
    }
}

impl Default for TopicTable {
    fn default() -> Self {
        fn numbered(prefix: &str, count: usize) -> Vec<String> {
            (1..=count).map(|i| format!("{prefix}{i}")).collect()
        }

        Self {
            sensor: numbered("bme680/p", 5),
            health: numbered("health/t", 4),
            water: numbered("water/a", 1),
            switch: numbered("home/switch", 12),
        }
    }
}

/// Immutable topic ↔ channel lookup.
#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    table: TopicTable,
    by_topic: HashMap<String, Channel>,
}

impl ChannelRegistry {
    /// Build a registry, rejecting empty or colliding topics.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyTopic`] if a topic is blank and
    /// [`RegistryError::DuplicateTopic`] if two slots claim the same topic.
    pub fn new(table: TopicTable) -> Result<Self, RegistryError> {
        let mut by_topic = HashMap::new();

        for category in Category::ALL {
            for (index, topic) in table.topics(category).iter().enumerate() {
                let channel = Channel::new(category, index);
                if topic.trim().is_empty() {
                    return Err(RegistryError::EmptyTopic {
                        slot: channel.wire_name(),
                    });
                }
                if let Some(existing) = by_topic.insert(topic.clone(), channel) {
                    return Err(RegistryError::DuplicateTopic {
                        topic: topic.clone(),
                        first: existing.wire_name(),
                        second: channel.wire_name(),
                    });
                }
            }
        }

        Ok(Self { table, by_topic })
    }

    /// Resolve a topic to any channel, switches included.
    #[must_use]
    pub fn resolve(&self, topic: &str) -> Option<Channel> {
        self.by_topic.get(topic).copied()
    }

    /// Resolve a topic to a telemetry channel. Switch topics and unknown
    /// topics both yield `None`.
    #[must_use]
    pub fn resolve_telemetry(&self, topic: &str) -> Option<Channel> {
        self.resolve(topic)
            .filter(|channel| channel.category.is_telemetry())
    }

    /// Number of slots in a category.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.table.topics(category).len()
    }

    /// Topic string of a channel, if the channel exists.
    #[must_use]
    pub fn topic(&self, channel: Channel) -> Option<&str> {
        self.table
            .topics(channel.category)
            .get(channel.index)
            .map(String::as_str)
    }

    /// All channels of a category, in index order.
    pub fn channels(&self, category: Category) -> impl Iterator<Item = Channel> + '_ {
        (0..self.count(category)).map(move |index| Channel::new(category, index))
    }

    /// Every topic the relay must subscribe to on the broker.
    pub fn topics(&self) -> impl Iterator<Item = &str> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.table.topics(category).iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_registry() -> ChannelRegistry {
        ChannelRegistry::new(TopicTable::default()).unwrap()
    }

    #[test]
    fn should_build_default_table_with_expected_counts() {
        let registry = default_registry();
        assert_eq!(registry.count(Category::Sensor), 5);
        assert_eq!(registry.count(Category::Health), 4);
        assert_eq!(registry.count(Category::Water), 1);
        assert_eq!(registry.count(Category::Switch), 12);
        assert_eq!(registry.topics().count(), 22);
    }

    #[test]
    fn should_resolve_telemetry_topics() {
        let registry = default_registry();
        assert_eq!(
            registry.resolve_telemetry("bme680/p3"),
            Some(Channel::new(Category::Sensor, 2))
        );
        assert_eq!(
            registry.resolve_telemetry("health/t1"),
            Some(Channel::new(Category::Health, 0))
        );
        assert_eq!(
            registry.resolve_telemetry("water/a1"),
            Some(Channel::new(Category::Water, 0))
        );
    }

    #[test]
    fn should_not_resolve_switch_topics_as_telemetry() {
        let registry = default_registry();
        assert_eq!(
            registry.resolve("home/switch4"),
            Some(Channel::new(Category::Switch, 3))
        );
        assert_eq!(registry.resolve_telemetry("home/switch4"), None);
    }

    #[test]
    fn should_not_resolve_unknown_topics() {
        let registry = default_registry();
        assert_eq!(registry.resolve("device"), None);
        assert_eq!(registry.resolve("bme680/p6"), None);
    }

    #[test]
    fn should_return_topic_of_channel() {
        let registry = default_registry();
        assert_eq!(
            registry.topic(Channel::new(Category::Switch, 11)),
            Some("home/switch12")
        );
        assert_eq!(registry.topic(Channel::new(Category::Switch, 12)), None);
    }

    #[test]
    fn should_reject_topic_shared_across_categories() {
        let mut table = TopicTable::default();
        table.water = vec!["health/t2".to_string()];

        let err = ChannelRegistry::new(table).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateTopic {
                topic: "health/t2".to_string(),
                first: "value2".to_string(),
                second: "water1".to_string(),
            }
        );
    }

    #[test]
    fn should_reject_topic_repeated_within_category() {
        let mut table = TopicTable::default();
        table.sensor[4] = "bme680/p1".to_string();
        assert!(matches!(
            ChannelRegistry::new(table),
            Err(RegistryError::DuplicateTopic { .. })
        ));
    }

    #[test]
    fn should_reject_blank_topic() {
        let mut table = TopicTable::default();
        table.switch[0] = "  ".to_string();
        assert_eq!(
            ChannelRegistry::new(table).unwrap_err(),
            RegistryError::EmptyTopic {
                slot: "switch1".to_string()
            }
        );
    }

    #[test]
    fn should_list_channels_in_index_order() {
        let registry = default_registry();
        let names: Vec<String> = registry
            .channels(Category::Health)
            .map(|c| c.wire_name())
            .collect();
        assert_eq!(names, ["value1", "value2", "value3", "value4"]);
    }
}
