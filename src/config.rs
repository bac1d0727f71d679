//! Runtime parameters, resolved once at startup.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

/// Hold time separating a short press from a long one.
pub const HOLD_TIMEOUT: Duration = Duration::from_secs(1);

/// Devices watched at once. Excess matches are discarded.
pub const MAX_DEVICES: usize = 2;

/// Client binary, relative to `$HOME`.
const CLIENT_RELATIVE_PATH: &str = ".steam/root/ubuntu12_32/steam";

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub hold_timeout: Duration,
    pub max_devices: usize,
    pub client: PathBuf,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        let home = std::env::var_os("HOME");
        if home.is_none() {
            tracing::warn!("$HOME is not set, the client cannot be located");
        }
        Self::with_home(home.as_deref())
    }

    pub fn with_home(home: Option<&OsStr>) -> Self {
        Self {
            hold_timeout: HOLD_TIMEOUT,
            max_devices: MAX_DEVICES,
            client: client_path(home),
        }
    }
}

/// Resolve the client binary under `home`.
///
/// Without a home directory the relative path is returned as is;
/// spawning it fails and the press is dropped.
fn client_path(home: Option<&OsStr>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(CLIENT_RELATIVE_PATH),
        None => PathBuf::from(CLIENT_RELATIVE_PATH),
    }
}
