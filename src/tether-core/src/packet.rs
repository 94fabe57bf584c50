use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed key-value message exchanged between paired devices.
///
/// The wire format is a single flat JSON object whose `type` member selects
/// the schema; every other member is a field of that schema. Field values are
/// restricted by convention to strings, lists of strings, nested objects, and
/// lists of string rows (sequence-of-sequences).
///
/// Packets are built per request/response and handed to a
/// [`DeviceChannel`](crate::handler::DeviceChannel) by value, so a sent
/// packet can no longer be mutated. They are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    #[serde(rename = "type")]
    packet_type: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Packet {
    pub fn new(packet_type: impl Into<String>) -> Self {
        Self {
            packet_type: packet_type.into(),
            fields: Map::new(),
        }
    }

    /// The wire-level type tag selecting this packet's schema.
    pub fn packet_type(&self) -> &str {
        &self.packet_type
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, Value::String(value.into()));
    }

    pub fn set_string_list(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.set(
            key,
            Value::Array(values.into_iter().map(Value::String).collect()),
        );
    }

    /// Stores a sequence-of-sequences of strings, the shape used for
    /// multi-valued attribute payloads.
    pub fn set_rows(&mut self, key: impl Into<String>, rows: Vec<Vec<String>>) {
        let rows = rows
            .into_iter()
            .map(|row| Value::Array(row.into_iter().map(Value::String).collect()))
            .collect();
        self.set(key, Value::Array(rows));
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Reads a list-of-strings field. Elements that are not strings are
    /// skipped rather than failing the whole read.
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        let items = self.fields.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect(),
        )
    }

    /// Reads a sequence-of-sequences field written by [`Packet::set_rows`].
    pub fn rows(&self, key: &str) -> Option<Vec<Vec<String>>> {
        let rows = self.fields.get(key)?.as_array()?;
        Some(
            rows.iter()
                .filter_map(Value::as_array)
                .map(|row| {
                    row.iter()
                        .filter_map(|cell| cell.as_str().map(str::to_owned))
                        .collect()
                })
                .collect(),
        )
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_object_with_type_tag() {
        let mut packet = Packet::new("contacts.response_uids");
        packet.set_string_list("uids", vec!["1".into(), "15".into()]);

        let json = serde_json::to_string(&packet).unwrap();
        assert!(json.contains("\"type\":\"contacts.response_uids\""));
        assert!(json.contains("\"uids\":[\"1\",\"15\"]"));
    }

    #[test]
    fn round_trips_through_json() {
        let mut packet = Packet::new("contacts.response_phones");
        packet.set_string_list("uids", vec!["3".into()]);
        packet.set_rows(
            "3",
            vec![vec!["+1(222)333-4444".into(), "0".into(), "Big Red Button".into()]],
        );

        let json = serde_json::to_string(&packet).unwrap();
        let parsed: Packet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, packet);
        assert_eq!(
            parsed.rows("3").unwrap(),
            vec![vec![
                "+1(222)333-4444".to_string(),
                "0".to_string(),
                "Big Red Button".to_string()
            ]]
        );
    }

    #[test]
    fn string_list_skips_non_string_elements() {
        let json = r#"{"type":"contacts.request_names_by_uid","uids":["1",2,"3"]}"#;
        let packet: Packet = serde_json::from_str(json).unwrap();
        assert_eq!(packet.string_list("uids").unwrap(), vec!["1", "3"]);
    }

    #[test]
    fn missing_field_reads_as_none() {
        let packet = Packet::new("contacts.request_names_by_uid");
        assert!(!packet.has("uids"));
        assert!(packet.string_list("uids").is_none());
    }
}
