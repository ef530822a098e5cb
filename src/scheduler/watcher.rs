use super::timer::WakeEvent;
use crate::config::loader::modified_time;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// How often the watcher looks at the config file.
pub const DEFAULT_POLL: Duration = Duration::from_secs(5);

/// Poll `path` and send [`WakeEvent::Reload`] whenever its mtime changes.
///
/// The thread exits once the receiving side is gone.
pub fn spawn_config_watcher(
    path: PathBuf,
    tx: Sender<WakeEvent>,
    poll: Duration,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("config-watcher".into())
        .spawn(move || {
            let mut last = modified_time(&path);
            loop {
                thread::sleep(poll);
                let current = modified_time(&path);
                if current == last {
                    continue;
                }
                last = current;
                debug!(path = %path.display(), "config file changed");
                if tx.send(WakeEvent::Reload).is_err() {
                    break;
                }
            }
        })
}
