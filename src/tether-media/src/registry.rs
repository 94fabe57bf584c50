use crate::snapshot::{DeviceId, PlayerSnapshot};
use std::collections::HashMap;
use std::sync::Mutex;

/// View onto the currently reachable remote devices and the player state
/// they advertise. Reads are synchronous and cheap; both calls may race with
/// updates, so callers needing a consistent picture take it under their own
/// exclusion domain.
pub trait DeviceRegistry: Send + Sync {
    fn reachable_devices(&self) -> Vec<DeviceId>;

    /// Snapshots for every player the device currently advertises. Empty
    /// when the device is unknown or advertises none.
    fn player_snapshots(&self, device: &DeviceId) -> Vec<PlayerSnapshot>;
}

/// In-memory [`DeviceRegistry`] fed by the transport layer.
///
/// Each update replaces a device's whole advertised player set; players
/// missing from the new set are gone, as is everything from a device that
/// disconnects.
#[derive(Default)]
pub struct SnapshotTable {
    devices: Mutex<HashMap<DeviceId, HashMap<String, PlayerSnapshot>>>,
}

impl SnapshotTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_device(&self, device: DeviceId, snapshots: Vec<PlayerSnapshot>) {
        let players: HashMap<String, PlayerSnapshot> = snapshots
            .into_iter()
            .map(|snapshot| (snapshot.player.clone(), snapshot))
            .collect();
        tracing::debug!(%device, players = players.len(), "device player set updated");
        self.devices.lock().unwrap().insert(device, players);
    }

    pub fn remove_device(&self, device: &DeviceId) {
        if self.devices.lock().unwrap().remove(device).is_some() {
            tracing::debug!(%device, "device removed from registry");
        }
    }
}

impl DeviceRegistry for SnapshotTable {
    fn reachable_devices(&self) -> Vec<DeviceId> {
        self.devices.lock().unwrap().keys().cloned().collect()
    }

    fn player_snapshots(&self, device: &DeviceId) -> Vec<PlayerSnapshot> {
        self.devices
            .lock()
            .unwrap()
            .get(device)
            .map(|players| players.values().cloned().collect())
            .unwrap_or_default()
    }
}
