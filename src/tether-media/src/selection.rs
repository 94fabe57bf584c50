use crate::registry::DeviceRegistry;
use crate::snapshot::{DeviceId, PlayerSnapshot};
use serde::{Deserialize, Serialize};

/// The sticky `(device, player)` choice retained across recomputations.
///
/// `device` can be set while `snapshot` is `None`: the remembered device is
/// still reachable but its remembered player has vanished and nothing else
/// is playing. Presenters treat a `None` snapshot as "show nothing".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub device: Option<DeviceId>,
    pub snapshot: Option<PlayerSnapshot>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn player(&self) -> Option<&str> {
        self.snapshot.as_ref().map(|s| s.player.as_str())
    }
}

/// Picks which player snapshot to surface.
///
/// Priority order, first satisfied rule wins:
/// 1. stick to the previous `(device, player)` while the device is reachable
///    and the player still exists;
/// 2. if that snapshot is gone or paused, prefer any playing player on the
///    same device;
/// 3. failing that, any playing player on any reachable device (switching
///    both device and player);
/// 4. with nothing playing anywhere, keep showing the reachable sticky
///    choice, paused or even vanished, rather than nothing;
/// 5. only when the sticky device itself is unreachable does the selection
///    clear to `(none, none)`.
///
/// Ties among simultaneously playing players are first-found; callers must
/// not depend on which one wins. Pure over the registry view: same inputs,
/// same output, no side effects.
pub fn select(registry: &dyn DeviceRegistry, previous: &Selection) -> Selection {
    let reachable = registry.reachable_devices();

    let mut device: Option<DeviceId> = None;
    let mut chosen: Option<PlayerSnapshot> = None;

    // Rule 1: the previously surfaced player, if its device is still here.
    if let (Some(prev_device), Some(prev_snapshot)) = (&previous.device, &previous.snapshot) {
        if reachable.contains(prev_device) {
            device = Some(prev_device.clone());
            chosen = registry
                .player_snapshots(prev_device)
                .into_iter()
                .find(|snapshot| snapshot.player == prev_snapshot.player);
        }
    }

    // Rule 2: another playing player on the same device. Only replaces the
    // sticky snapshot when one is actually found.
    if !chosen.as_ref().is_some_and(|s| s.is_playing) {
        if let Some(current) = &device {
            if let Some(playing) = registry
                .player_snapshots(current)
                .into_iter()
                .find(|snapshot| snapshot.is_playing)
            {
                chosen = Some(playing);
            }
        }
    }

    // Rule 3: a playing player anywhere else, switching devices.
    if !chosen.as_ref().is_some_and(|s| s.is_playing) {
        for candidate in &reachable {
            if let Some(playing) = registry
                .player_snapshots(candidate)
                .into_iter()
                .find(|snapshot| snapshot.is_playing)
            {
                chosen = Some(playing);
                device = Some(candidate.clone());
                break;
            }
        }
    }

    // Rules 4 and 5 fall out of what is left: a reachable sticky device is
    // retained (with or without its snapshot), an unreachable one was never
    // adopted above.
    Selection {
        device,
        snapshot: chosen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SnapshotTable;

    fn playing(device: &str, player: &str) -> PlayerSnapshot {
        let mut snapshot = PlayerSnapshot::new(device, player);
        snapshot.is_playing = true;
        snapshot.can_pause = true;
        snapshot
    }

    fn paused(device: &str, player: &str) -> PlayerSnapshot {
        let mut snapshot = PlayerSnapshot::new(device, player);
        snapshot.can_play = true;
        snapshot
    }

    fn selected(device: &str, snapshot: &PlayerSnapshot) -> Selection {
        Selection {
            device: Some(DeviceId::new(device)),
            snapshot: Some(snapshot.clone()),
        }
    }

    #[test]
    fn sticks_to_playing_selection() {
        let table = SnapshotTable::new();
        let vlc = playing("phone-1", "vlc");
        table.update_device(
            DeviceId::new("phone-1"),
            vec![vlc.clone(), playing("phone-1", "spotify")],
        );

        let next = select(&table, &selected("phone-1", &vlc));
        assert_eq!(next.device, Some(DeviceId::new("phone-1")));
        assert_eq!(next.player(), Some("vlc"));
    }

    #[test]
    fn sticky_snapshot_updates_carry_new_fields() {
        let table = SnapshotTable::new();
        let mut vlc = playing("phone-1", "vlc");
        vlc.title = "Second Track".into();
        table.update_device(DeviceId::new("phone-1"), vec![vlc.clone()]);

        let mut old = vlc.clone();
        old.title = "First Track".into();
        let next = select(&table, &selected("phone-1", &old));
        assert_eq!(next.snapshot.unwrap().title, "Second Track");
    }

    #[test]
    fn prefers_playing_player_on_same_device_over_other_devices() {
        let table = SnapshotTable::new();
        let stopped = paused("phone-1", "vlc");
        table.update_device(
            DeviceId::new("phone-1"),
            vec![stopped.clone(), playing("phone-1", "spotify")],
        );
        table.update_device(DeviceId::new("tablet-2"), vec![playing("tablet-2", "mpv")]);

        let next = select(&table, &selected("phone-1", &stopped));
        assert_eq!(next.device, Some(DeviceId::new("phone-1")));
        assert_eq!(next.player(), Some("spotify"));
    }

    #[test]
    fn switches_device_when_only_remote_player_is_playing() {
        let table = SnapshotTable::new();
        let stopped = paused("phone-1", "vlc");
        table.update_device(DeviceId::new("phone-1"), vec![stopped.clone()]);
        table.update_device(DeviceId::new("tablet-2"), vec![playing("tablet-2", "mpv")]);

        let next = select(&table, &selected("phone-1", &stopped));
        assert_eq!(next.device, Some(DeviceId::new("tablet-2")));
        assert_eq!(next.player(), Some("mpv"));
    }

    #[test]
    fn retains_paused_selection_when_nothing_plays() {
        let table = SnapshotTable::new();
        let stopped = paused("phone-1", "vlc");
        table.update_device(DeviceId::new("phone-1"), vec![stopped.clone()]);
        table.update_device(DeviceId::new("tablet-2"), vec![paused("tablet-2", "mpv")]);

        let next = select(&table, &selected("phone-1", &stopped));
        assert_eq!(next.device, Some(DeviceId::new("phone-1")));
        assert_eq!(next.player(), Some("vlc"));
    }

    #[test]
    fn retains_device_with_cleared_snapshot_when_sticky_player_vanishes() {
        let table = SnapshotTable::new();
        let gone = paused("phone-1", "vlc");
        table.update_device(DeviceId::new("phone-1"), vec![]);

        let next = select(&table, &selected("phone-1", &gone));
        assert_eq!(next.device, Some(DeviceId::new("phone-1")));
        assert!(next.snapshot.is_none());
    }

    #[test]
    fn clears_when_sticky_device_unreachable_and_nothing_plays() {
        let table = SnapshotTable::new();
        let stranded = playing("phone-1", "vlc");
        table.update_device(DeviceId::new("tablet-2"), vec![paused("tablet-2", "mpv")]);

        let next = select(&table, &selected("phone-1", &stranded));
        assert_eq!(next, Selection::none());
    }

    #[test]
    fn empty_world_selects_nothing() {
        let table = SnapshotTable::new();
        assert_eq!(select(&table, &Selection::none()), Selection::none());
    }

    #[test]
    fn adopts_playing_player_from_cold_start() {
        let table = SnapshotTable::new();
        table.update_device(DeviceId::new("phone-1"), vec![playing("phone-1", "vlc")]);

        let next = select(&table, &Selection::none());
        assert_eq!(next.device, Some(DeviceId::new("phone-1")));
        assert_eq!(next.player(), Some("vlc"));
    }
}
