use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

/// Sent from signal handlers and the config watcher into the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeEvent {
    Reload,
    Shutdown,
}

/// Why [`Timer::wait`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Reload,
    Shutdown,
}

/// Sleep that any holder of the matching sender can cut short.
pub struct Timer {
    rx: Receiver<WakeEvent>,
}

pub fn channel() -> (Sender<WakeEvent>, Timer) {
    let (tx, rx) = mpsc::channel();
    (tx, Timer { rx })
}

impl Timer {
    /// Block for `duration` or until an event arrives.
    ///
    /// Events queued at the same time are coalesced; a pending shutdown wins
    /// over any number of reloads.
    pub fn wait(&self, duration: Duration) -> Wake {
        let first = match self.rx.recv_timeout(duration) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return Wake::Elapsed,
            Err(RecvTimeoutError::Disconnected) => {
                // Nobody can wake us anymore; fall back to a plain sleep.
                thread::sleep(duration);
                return Wake::Elapsed;
            }
        };

        let mut wake = Wake::from(first);
        loop {
            match self.rx.try_recv() {
                Ok(WakeEvent::Shutdown) => wake = Wake::Shutdown,
                Ok(WakeEvent::Reload) => {}
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        wake
    }
}

impl From<WakeEvent> for Wake {
    fn from(event: WakeEvent) -> Self {
        match event {
            WakeEvent::Reload => Wake::Reload,
            WakeEvent::Shutdown => Wake::Shutdown,
        }
    }
}
