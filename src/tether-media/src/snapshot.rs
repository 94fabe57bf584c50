use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one paired remote device.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable point-in-time view of one player's state on one device.
///
/// Identified by the `(device, player)` pair. Updates from the owning device
/// replace the whole snapshot; fields are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub device: DeviceId,
    /// Player name as advertised by the device, unique per device.
    pub player: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Track length in milliseconds; zero or negative means unknown.
    #[serde(default = "unknown_length")]
    pub length: i64,
    /// Playback position in milliseconds.
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub can_play: bool,
    #[serde(default)]
    pub can_pause: bool,
    #[serde(default)]
    pub can_go_next: bool,
    #[serde(default)]
    pub can_go_previous: bool,
}

impl PlayerSnapshot {
    /// A stopped snapshot with empty metadata and no capabilities.
    pub fn new(device: impl Into<DeviceId>, player: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            player: player.into(),
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            length: unknown_length(),
            position: 0,
            is_playing: false,
            can_play: false,
            can_pause: false,
            can_go_next: false,
            can_go_previous: false,
        }
    }

    pub fn has_known_length(&self) -> bool {
        self.length > 0
    }
}

fn unknown_length() -> i64 {
    -1
}
