//! Event loop — multiplexes device readiness and the hold deadline.

use std::future;
use std::io;

use futures::future::select_all;
use tokio::time::{self, Instant};

use crate::dispatch::{Dispatcher, Notifier};
use crate::input::{DeviceReader, EventSource};
use crate::press::{Action, GestureTimer, PressClassifier, Signal};

/// What ended a wait.
enum Wake {
    Device(usize, io::Result<Vec<Signal>>),
    Deadline,
}

/// Single-task driver: readers in, classifier in the middle, dispatcher out.
pub struct EventLoop<S, N> {
    readers: Vec<DeviceReader<S>>,
    classifier: PressClassifier,
    timer: GestureTimer,
    dispatcher: Dispatcher<N>,
}

impl<S: EventSource, N: Notifier> EventLoop<S, N> {
    pub fn new(
        readers: Vec<DeviceReader<S>>,
        dispatcher: Dispatcher<N>,
        timer: GestureTimer,
    ) -> Self {
        Self {
            readers,
            classifier: PressClassifier::new(),
            timer,
            dispatcher,
        }
    }

    /// Run until the future is dropped.
    pub async fn run(&mut self) {
        loop {
            match self.wait().await {
                Wake::Device(_, Ok(signals)) => {
                    for signal in signals {
                        self.handle_signal(signal).await;
                    }
                }
                Wake::Device(idx, Err(e)) if e.kind() == io::ErrorKind::Interrupted => {
                    tracing::debug!(idx, "device read interrupted");
                }
                Wake::Device(idx, Err(e)) => {
                    let reader = self.readers.remove(idx);
                    tracing::warn!(
                        path = %reader.path().display(),
                        error = %e,
                        "device read failed, no longer watching it"
                    );
                }
                Wake::Deadline => self.handle_deadline().await,
            }
        }
    }

    /// Block until a device is readable or the deadline passes.
    ///
    /// Devices are polled first so events already queued are classified
    /// before a coincident expiry.
    async fn wait(&mut self) -> Wake {
        let deadline = self.timer.deadline();
        let expiry = async move {
            match deadline {
                Some(deadline) => time::sleep_until(deadline).await,
                None => future::pending().await,
            }
        };
        let readers = next_ready(&mut self.readers);

        tokio::select! {
            biased;
            (idx, result) = readers => Wake::Device(idx, result),
            () = expiry => Wake::Deadline,
        }
    }

    async fn handle_signal(&mut self, signal: Signal) {
        tracing::debug!(?signal, active = self.classifier.is_active(), "input signal");
        match self.classifier.on_signal(signal) {
            Some(Action::ArmTimer) => self.timer.arm(Instant::now()),
            Some(Action::Dispatch(gesture)) => {
                self.dispatcher.dispatch(gesture, &mut self.timer).await;
            }
            None => {}
        }
    }

    async fn handle_deadline(&mut self) {
        self.timer.expire(Instant::now());
        if !self.timer.is_fired() {
            return;
        }
        match self.classifier.on_expiry() {
            Some(Action::Dispatch(gesture)) => {
                self.dispatcher.dispatch(gesture, &mut self.timer).await;
            }
            _ => {
                tracing::debug!("stale hold deadline ignored");
                self.timer.disarm();
            }
        }
    }
}

/// Wait for the first reader with data. Never resolves without readers.
async fn next_ready<S: EventSource>(
    readers: &mut [DeviceReader<S>],
) -> (usize, io::Result<Vec<Signal>>) {
    if readers.is_empty() {
        return future::pending().await;
    }
    let pending = readers
        .iter_mut()
        .enumerate()
        .map(|(idx, reader)| Box::pin(async move { (idx, reader.next_signals().await) }));
    let (output, _, _) = select_all(pending).await;
    output
}
