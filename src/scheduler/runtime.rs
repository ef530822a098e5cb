use super::ServiceProvider;
use crate::build::ProcessRunner;
use crate::config::Settings;
use crate::error::Result;
use crate::notify::{LogNotifier, SmtpNotifier};
use crate::remote::AurClient;
use crate::traits::{Notifier, Services, SystemClock};
use tracing::debug;

/// Real collaborators: wall clock, AUR over HTTPS, child processes, SMTP.
pub struct Runtime {
    clock: SystemClock,
    aur: AurClient,
    runner: ProcessRunner,
    notifier: Box<dyn Notifier>,
}

impl Runtime {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            clock: SystemClock,
            aur: AurClient::new(&settings.aur_url)?,
            runner: ProcessRunner,
            notifier: notifier_for(settings),
        })
    }
}

fn notifier_for(settings: &Settings) -> Box<dyn Notifier> {
    match &settings.smtp {
        Some(smtp) => Box::new(SmtpNotifier::new(smtp.clone())),
        None => Box::new(LogNotifier),
    }
}

impl ServiceProvider for Runtime {
    fn services(&self) -> Services<'_> {
        Services {
            clock: &self.clock,
            metadata: &self.aur,
            sources: &self.aur,
            runner: &self.runner,
            notifier: self.notifier.as_ref(),
        }
    }

    fn reconfigure(&mut self, settings: &Settings) -> Result<()> {
        self.aur = AurClient::new(&settings.aur_url)?;
        self.notifier = notifier_for(settings);
        debug!(aur_url = %settings.aur_url, smtp = settings.smtp.is_some(), "services rebuilt");
        Ok(())
    }
}
