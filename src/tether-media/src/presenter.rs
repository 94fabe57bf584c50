use crate::snapshot::PlayerSnapshot;

/// External collaborator that renders the selected player somewhere visible
/// (a system media session, a notification, a status line).
///
/// Implementations must reflect title/artist/album/position and translate
/// the capability flags into whatever controls they expose; none of that is
/// this crate's concern. Both calls are fire-and-forget from the
/// coordinator's point of view and must not block.
pub trait SessionPresenter: Send + Sync {
    /// The surfaced player changed identity or fields. `None` means release
    /// or hide any externally visible session representation.
    fn selection_changed(&self, snapshot: Option<&PlayerSnapshot>);

    /// The presenter enable flag was toggled.
    fn config_changed(&self, enabled: bool);
}

/// Presenter that mirrors selection changes into the log stream. Useful as
/// a default wiring target and in headless setups.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl SessionPresenter for LogPresenter {
    fn selection_changed(&self, snapshot: Option<&PlayerSnapshot>) {
        match snapshot {
            Some(snapshot) => tracing::info!(
                device = %snapshot.device,
                player = snapshot.player,
                title = snapshot.title,
                artist = snapshot.artist,
                playing = snapshot.is_playing,
                "media selection changed"
            ),
            None => tracing::info!("media selection cleared"),
        }
    }

    fn config_changed(&self, enabled: bool) {
        tracing::info!(enabled, "session presenter toggled");
    }
}
