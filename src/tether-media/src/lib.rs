//! Media-player selection for a device-pairing companion.
//!
//! Reachable remote devices each advertise a set of players; this crate
//! tracks their snapshots, picks the one player worth surfacing (sticky
//! across updates, preferring whatever is actively playing), and drives an
//! external session presenter when the choice or its metadata changes.

mod coordinator;
mod presenter;
mod registry;
mod selection;
mod snapshot;

pub use coordinator::SelectionCoordinator;
pub use presenter::{LogPresenter, SessionPresenter};
pub use registry::{DeviceRegistry, SnapshotTable};
pub use selection::{select, Selection};
pub use snapshot::{DeviceId, PlayerSnapshot};
