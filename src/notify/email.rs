//! SMTP delivery via `lettre`'s blocking transport.

use crate::config::SmtpSettings;
use crate::error::{AurwatchError, Result};
use crate::notify::Message;
use crate::traits::Notifier;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use tracing::info;

pub struct SmtpNotifier {
    settings: SmtpSettings,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn build_email(&self, message: &Message) -> Result<lettre::Message> {
        let from = self
            .settings
            .from
            .parse::<Mailbox>()
            .map_err(|e| AurwatchError::NotifyError(format!("invalid from address: {}", e)))?;
        let to = message
            .to
            .parse::<Mailbox>()
            .map_err(|e| AurwatchError::NotifyError(format!("invalid recipient: {}", e)))?;

        let builder = lettre::Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone());

        let email = match &message.attachment {
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.body.clone()),
            Some(attachment) => builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(message.body.clone()))
                    .singlepart(
                        Attachment::new(attachment.filename.clone())
                            .body(attachment.content.clone(), ContentType::TEXT_PLAIN),
                    ),
            ),
        };

        email.map_err(|e| AurwatchError::NotifyError(format!("email build error: {}", e)))
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let mut builder = SmtpTransport::starttls_relay(&self.settings.host)
            .map_err(|e| AurwatchError::NotifyError(format!("smtp relay: {}", e)))?
            .port(self.settings.port);

        if let (Some(user), Some(pass)) = (&self.settings.user, &self.settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, message: &Message) -> Result<()> {
        let email = self.build_email(message)?;
        self.transport()?
            .send(&email)
            .map_err(|e| AurwatchError::NotifyError(format!("smtp transport: {}", e)))?;

        info!(to = %message.to, subject = %message.subject, "notification email sent");
        Ok(())
    }
}
