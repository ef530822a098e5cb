//! Operator notifications: what to say, and how to ship it.

pub mod email;

use crate::build::{BuildOutcome, BuildReport};
use crate::project_identity;
use crate::remote::Snapshot;
use crate::traits::Notifier;
use std::fs;
use tracing::{error, info};

pub use email::SmtpNotifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub to: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

/// Deliver, logging instead of propagating any failure.
pub fn send_best_effort(notifier: &dyn Notifier, message: &Message) -> bool {
    match notifier.send(message) {
        Ok(()) => true,
        Err(e) => {
            error!(to = %message.to, subject = %message.subject, "notification failed: {}", e);
            false
        }
    }
}

/// Used when no SMTP relay is configured: the message only reaches the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &Message) -> crate::error::Result<()> {
        info!(to = %message.to, subject = %message.subject, "notification (no smtp configured)");
        Ok(())
    }
}

pub fn build_report_message(
    package: &str,
    snapshot: &Snapshot,
    report: &BuildReport,
    to: &str,
) -> Message {
    let status = match report.outcome {
        BuildOutcome::Success => "succeeded",
        BuildOutcome::Failure => "FAILED",
    };
    // Compiler output is not always valid UTF-8.
    let log = fs::read(&report.log_path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_else(|e| format!("<could not read {}: {}>", report.log_path.display(), e));
    let filename = report
        .log_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "build.log".to_string());

    Message {
        subject: format!(
            "{} build of {} {} {}",
            project_identity::mail_subject_prefix(),
            package,
            snapshot.version,
            status
        ),
        to: to.to_string(),
        body: format!(
            "Package:  {}\nVersion:  {}\nStatus:   {}\nDuration: {}s\nLog:      {}\n",
            package,
            snapshot.version,
            status,
            report.duration.as_secs(),
            report.log_path.display()
        ),
        attachment: Some(Attachment {
            filename,
            content: log,
        }),
    }
}

pub fn maintainer_mismatch_message(
    package: &str,
    expected: &str,
    reported: &str,
    snapshot: &Snapshot,
    to: &str,
) -> Message {
    Message {
        subject: format!(
            "{} maintainer of {} changed to {}",
            project_identity::mail_subject_prefix(),
            package,
            reported
        ),
        to: to.to_string(),
        body: format!(
            "The upstream maintainer of '{}' does not match the configuration.\n\n\
             Expected: {}\nReported: {}\nVersion:  {}\n\n\
             Builds of this package are suspended until the configured maintainer \
             is updated or upstream ownership returns.\n",
            package, expected, reported, snapshot.version
        ),
        attachment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AurwatchError;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::tempdir;

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn send(&self, _message: &Message) -> crate::error::Result<()> {
            Err(AurwatchError::NotifyError("relay down".into()))
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            package_base: "yay".into(),
            version: "12.3.5-1".into(),
            last_modified: 1000,
            maintainer: Some("jguer".into()),
            url_path: "/cgit/aur.git/snapshot/yay.tar.gz".into(),
        }
    }

    #[test]
    fn delivery_failure_is_swallowed() {
        let message = maintainer_mismatch_message("yay", "jguer", "mallory", &snapshot(), "ops@x");
        assert!(!send_best_effort(&FailingNotifier, &message));
        assert!(send_best_effort(&LogNotifier, &message));
    }

    #[test]
    fn build_report_attaches_log() {
        let dir = tempdir().expect("tempdir");
        let log_path = dir.path().join("20260101-000000.log");
        fs::write(&log_path, "==> Finished making: yay\n").expect("write log");
        let report = BuildReport {
            outcome: BuildOutcome::Failure,
            log_path: log_path.clone(),
            duration: Duration::from_secs(42),
        };

        let message = build_report_message("yay", &snapshot(), &report, "ops@x");
        assert!(message.subject.contains("yay 12.3.5-1 FAILED"));
        assert!(message.body.contains("Duration: 42s"));
        let attachment = message.attachment.expect("log attached");
        assert_eq!(attachment.filename, "20260101-000000.log");
        assert!(attachment.content.contains("Finished making"));
    }

    #[test]
    fn non_utf8_log_is_attached_lossily() {
        let dir = tempdir().expect("tempdir");
        let log_path = dir.path().join("20260101-000000.log");
        fs::write(&log_path, b"==> running: makepkg\ncaf\xe9\n==> failed after 3s\n")
            .expect("write log");
        let report = BuildReport {
            outcome: BuildOutcome::Failure,
            log_path,
            duration: Duration::from_secs(3),
        };

        let message = build_report_message("yay", &snapshot(), &report, "ops@x");
        let content = message.attachment.expect("log attached").content;
        assert!(content.contains("caf\u{fffd}"));
        assert!(content.contains("failed after 3s"));
        assert!(!content.contains("could not read"));
    }

    #[test]
    fn unreadable_log_still_produces_a_message() {
        let report = BuildReport {
            outcome: BuildOutcome::Success,
            log_path: PathBuf::from("/nonexistent/aurwatch.log"),
            duration: Duration::from_secs(1),
        };
        let message = build_report_message("yay", &snapshot(), &report, "ops@x");
        assert!(message.subject.contains("succeeded"));
        assert!(message.attachment.expect("attachment").content.contains("could not read"));
    }
}
