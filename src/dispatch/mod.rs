//! Gesture dispatch — notify the client of a classified press.
//!
//! The [`Notifier`] trait is the seam to the outside world; the daemon
//! uses [`SteamClient`], tests substitute a recorder. [`Dispatcher`]
//! disarms the hold deadline before notifying and swallows failures.

mod steam;

use std::future::Future;
use std::io;
use std::path::PathBuf;

use crate::press::{Gesture, GestureTimer};

pub use steam::SteamClient;

/// Dispatch errors. Logged and dropped by [`Dispatcher`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to start {client}: {source}")]
    Spawn { client: PathBuf, source: io::Error },
    #[error("failed waiting for client: {0}")]
    Wait(io::Error),
}

/// Delivers a gesture to the client application.
///
/// Resolves once the attempt has completed. `Err` means the attempt
/// could not be started or awaited, not that the client rejected it.
pub trait Notifier {
    fn notify(&mut self, gesture: Gesture) -> impl Future<Output = Result<(), DispatchError>>;
}

/// Forwards classified gestures, one at a time.
pub struct Dispatcher<N> {
    notifier: N,
}

impl<N: Notifier> Dispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Disarm `timer`, then notify and wait for completion.
    ///
    /// Best-effort: a failed notification loses the gesture.
    pub async fn dispatch(&mut self, gesture: Gesture, timer: &mut GestureTimer) {
        timer.disarm();

        tracing::info!(%gesture, "dispatching power press");
        if let Err(e) = self.notifier.notify(gesture).await {
            tracing::warn!(%gesture, error = %e, "power press dropped");
        }
    }
}
