//! Steam client notifier — `steam -ifrunning steam://<kind>powerpress`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use super::{DispatchError, Notifier};
use crate::press::Gesture;

/// Invokes the Steam client binary, which forwards the URL to a running
/// instance and exits. Does nothing if Steam is not running.
#[derive(Debug, Clone)]
pub struct SteamClient {
    client: PathBuf,
}

impl SteamClient {
    pub fn new(client: impl Into<PathBuf>) -> Self {
        Self {
            client: client.into(),
        }
    }

    pub fn client(&self) -> &Path {
        &self.client
    }
}

/// URL understood by the client for a gesture.
pub fn press_url(gesture: Gesture) -> String {
    format!("steam://{gesture}powerpress")
}

impl Notifier for SteamClient {
    async fn notify(&mut self, gesture: Gesture) -> Result<(), DispatchError> {
        let mut child = Command::new(&self.client)
            .arg("-ifrunning")
            .arg(press_url(gesture))
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| DispatchError::Spawn {
                client: self.client.clone(),
                source,
            })?;

        // tokio retries interrupted waits internally.
        let status = child.wait().await.map_err(DispatchError::Wait)?;
        tracing::debug!(%gesture, %status, "client exited");
        Ok(())
    }
}
