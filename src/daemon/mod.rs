//! Daemon — device setup, event loop, shutdown.
//!
//! Opens the power button devices, then drives the [`EventLoop`] on the
//! current task until SIGTERM or SIGINT. Finding no device at all is a
//! clean exit.

mod event_loop;

use std::future::Future;
use std::io;
use std::path::PathBuf;

use tokio::signal::unix::{Signal as UnixSignal, SignalKind, signal};

use crate::config::DaemonConfig;
use crate::dispatch::{Dispatcher, SteamClient};
use crate::input::{DeviceLocator, DeviceReader, EvdevSource, UdevEnumerator};
use crate::press::GestureTimer;

pub use event_loop::EventLoop;

/// Daemon startup errors. Nothing after startup is fatal.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run the daemon.
///
/// `devices` replaces udev discovery when non-empty. Returns `Ok` on
/// shutdown signal and when no usable device exists.
pub async fn run(config: DaemonConfig, devices: Vec<PathBuf>) -> Result<(), DaemonError> {
    let locator = DeviceLocator::new(UdevEnumerator, config.max_devices);
    let sources = locator.locate(&devices, EvdevSource::open);
    if sources.is_empty() {
        tracing::info!("no power button devices found, exiting");
        return Ok(());
    }

    let readers: Vec<_> = sources
        .into_iter()
        .map(|source| DeviceReader::new(source.path().to_path_buf(), source))
        .collect();

    let client = SteamClient::new(config.client);
    tracing::info!(
        devices = readers.len(),
        client = %client.client().display(),
        hold = ?config.hold_timeout,
        "powerbuttond running"
    );

    let mut event_loop = EventLoop::new(
        readers,
        Dispatcher::new(client),
        GestureTimer::new(config.hold_timeout),
    );

    let shutdown = Shutdown::install()?;
    shutdown.run_until(event_loop.run()).await;
    Ok(())
}

/// Why [`Shutdown::run_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Finished,
    Terminated,
    Interrupted,
}

/// SIGTERM and SIGINT listeners.
struct Shutdown {
    sigterm: UnixSignal,
    sigint: UnixSignal,
}

impl Shutdown {
    /// Register the handlers. Signals raised after this are not lost.
    fn install() -> io::Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Drive `work` until it completes or a shutdown signal arrives.
    async fn run_until(mut self, work: impl Future<Output = ()>) -> Stop {
        tokio::select! {
            biased;
            () = work => Stop::Finished,
            _ = self.sigterm.recv() => {
                tracing::info!("received SIGTERM, shutting down");
                Stop::Terminated
            }
            _ = self.sigint.recv() => {
                tracing::info!("received SIGINT, shutting down");
                Stop::Interrupted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::future;
    use std::time::Duration;

    use nix::sys::signal::{Signal as NixSignal, raise};
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn no_usable_device_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_device = dir.path().join("event0");
        std::fs::write(&not_a_device, b"").unwrap();

        let config = DaemonConfig::with_home(Some(OsStr::new("/nonexistent")));
        let result = run(config, vec![not_a_device, dir.path().join("event1")]).await;
        assert!(result.is_ok());
    }

    // Listeners are process-wide, so both signals share one test.
    #[tokio::test]
    async fn shutdown_signals_stop_the_daemon() {
        let shutdown = Shutdown::install().unwrap();
        raise(NixSignal::SIGTERM).unwrap();
        let stop = timeout(Duration::from_secs(5), shutdown.run_until(future::pending()))
            .await
            .unwrap();
        assert_eq!(stop, Stop::Terminated);

        let shutdown = Shutdown::install().unwrap();
        raise(NixSignal::SIGINT).unwrap();
        let stop = timeout(Duration::from_secs(5), shutdown.run_until(future::pending()))
            .await
            .unwrap();
        assert_eq!(stop, Stop::Interrupted);
    }

    #[tokio::test]
    async fn finished_work_returns_without_a_signal() {
        let shutdown = Shutdown::install().unwrap();
        assert_eq!(shutdown.run_until(async {}).await, Stop::Finished);
    }

    #[test]
    fn error_display() {
        let e = DaemonError::from(io::Error::other("signal setup"));
        assert_eq!(e.to_string(), "I/O error: signal setup");
    }
}
