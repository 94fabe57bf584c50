use crate::presenter::SessionPresenter;
use crate::registry::DeviceRegistry;
use crate::selection::{select, Selection};
use crate::snapshot::PlayerSnapshot;
use std::sync::{Arc, Mutex};

struct CoordinatorState {
    selection: Selection,
    enabled: bool,
}

/// Owns the sticky selection and drives the presenter.
///
/// One explicitly constructed instance per process, torn down with it; the
/// registry and presenter are injected. All selection state lives behind a
/// single mutex, so recomputations are serialized: at most one runs at a
/// time, each runs to completion, and a run working from superseded data is
/// simply corrected by the next call. The presenter is always invoked after
/// the lock is released, so a slow presenter never stalls updates.
pub struct SelectionCoordinator {
    registry: Arc<dyn DeviceRegistry>,
    presenter: Arc<dyn SessionPresenter>,
    state: Mutex<CoordinatorState>,
}

impl SelectionCoordinator {
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        presenter: Arc<dyn SessionPresenter>,
        enabled: bool,
    ) -> Self {
        Self {
            registry,
            presenter,
            state: Mutex::new(CoordinatorState {
                selection: Selection::none(),
                enabled,
            }),
        }
    }

    /// Recomputes the selection against the current registry view.
    ///
    /// The transport layer calls this after every snapshot push or
    /// reachability change. The presenter is notified when the selection
    /// changed identity or any field of the surfaced snapshot changed.
    pub fn refresh(&self) {
        let notify: Option<Option<PlayerSnapshot>> = {
            let mut state = self.state.lock().unwrap();
            let next = select(self.registry.as_ref(), &state.selection);
            if next == state.selection {
                None
            } else {
                state.selection = next;
                if state.enabled {
                    Some(state.selection.snapshot.clone())
                } else {
                    None
                }
            }
        };

        if let Some(snapshot) = notify {
            self.presenter.selection_changed(snapshot.as_ref());
        }
    }

    /// Toggles the presenter. Disabling hides any visible session without
    /// touching the tracked selection; re-enabling re-presents it.
    pub fn set_enabled(&self, enabled: bool) {
        let snapshot = {
            let mut state = self.state.lock().unwrap();
            if state.enabled == enabled {
                return;
            }
            state.enabled = enabled;
            if enabled {
                state.selection.snapshot.clone()
            } else {
                None
            }
        };

        self.presenter.config_changed(enabled);
        self.presenter.selection_changed(snapshot.as_ref());
    }

    /// Consistent copy of the current selection.
    pub fn selection(&self) -> Selection {
        self.state.lock().unwrap().selection.clone()
    }
}
