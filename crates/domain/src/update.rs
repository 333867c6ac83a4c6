//! State update payload pushed to live subscribers.
//!
//! A full snapshot has every group set; a partial update carries only the
//! group that changed. Absent groups are omitted from the JSON entirely:
//!
//! ```json
//! {"buttonStates": ["false", "true", …], "sensorData": {"sensor1": "21.4", …}}
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::channel::Category;
use crate::switch::SwitchState;

/// Named telemetry values of one group, kept in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupValues(Vec<(String, String)>);

impl GroupValues {
    #[must_use]
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self(entries)
    }

    /// Value of the slot with the given wire name (`sensor1`, `value2`, …).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for GroupValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for SwitchState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_value())
    }
}

/// Full or partial view of the relay state.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_states: Option<Vec<SwitchState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_data: Option<GroupValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_data: Option<GroupValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_data: Option<GroupValues>,
}

impl StateUpdate {
    /// Slot for a telemetry group. `None` for [`Category::Switch`].
    pub fn group_mut(&mut self, category: Category) -> Option<&mut Option<GroupValues>> {
        match category {
            Category::Sensor => Some(&mut self.sensor_data),
            Category::Health => Some(&mut self.health_data),
            Category::Water => Some(&mut self.water_data),
            Category::Switch => None,
        }
    }

    /// Telemetry group values, if present in this update.
    #[must_use]
    pub fn group(&self, category: Category) -> Option<&GroupValues> {
        match category {
            Category::Sensor => self.sensor_data.as_ref(),
            Category::Health => self.health_data.as_ref(),
            Category::Water => self.water_data.as_ref(),
            Category::Switch => None,
        }
    }

    /// Whether every group is present.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.button_states.is_some()
            && self.sensor_data.is_some()
            && self.health_data.is_some()
            && self.water_data.is_some()
    }

    /// Payload keys present in this update, in [`Category::ALL`] order.
    #[must_use]
    pub fn group_keys(&self) -> Vec<&'static str> {
        Category::ALL
            .into_iter()
            .filter(|category| match category {
                Category::Switch => self.button_states.is_some(),
                other => self.group(*other).is_some(),
            })
            .map(Category::group_key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensors() -> GroupValues {
        GroupValues::new(vec![
            ("sensor1".to_string(), "21.5".to_string()),
            ("sensor2".to_string(), String::new()),
        ])
    }

    #[test]
    fn should_omit_absent_groups_from_json() {
        let update = StateUpdate {
            sensor_data: Some(sensors()),
            ..StateUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"sensorData": {"sensor1": "21.5", "sensor2": ""}})
        );
    }

    #[test]
    fn should_encode_button_states_as_string_booleans() {
        let update = StateUpdate {
            button_states: Some(vec![SwitchState::Off, SwitchState::On]),
            ..StateUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"buttonStates":["false","true"]}"#);
    }

    #[test]
    fn should_keep_slot_order_in_group_json() {
        let json = serde_json::to_string(&sensors()).unwrap();
        assert_eq!(json, r#"{"sensor1":"21.5","sensor2":""}"#);
    }

    #[test]
    fn should_report_full_only_when_every_group_is_present() {
        let mut update = StateUpdate {
            button_states: Some(vec![]),
            sensor_data: Some(GroupValues::default()),
            health_data: Some(GroupValues::default()),
            ..StateUpdate::default()
        };
        assert!(!update.is_full());
        update.water_data = Some(GroupValues::default());
        assert!(update.is_full());
    }

    #[test]
    fn should_list_present_group_keys() {
        let update = StateUpdate {
            health_data: Some(GroupValues::default()),
            ..StateUpdate::default()
        };
        assert_eq!(update.group_keys(), ["healthData"]);
        assert!(StateUpdate::default().group_keys().is_empty());
    }

    #[test]
    fn should_look_up_group_value_by_name() {
        let values = sensors();
        assert_eq!(values.get("sensor1"), Some("21.5"));
        assert_eq!(values.get("sensor9"), None);
    }
}
