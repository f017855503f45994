//! SMTP delivery of assignment and reminder emails.
//!
//! Mail transport settings live on the settings row and are reloaded for
//! every send, so an admin fixing SMTP credentials takes effect without a
//! restart. When no host is configured the would-be send is logged and
//! reported as a failure, which leaves `email_sent` false for later
//! recovery.

use async_trait::async_trait;
use domain::models::Settings;
use domain::services::{AssignmentNotification, AssignmentNotifier, NotifyError};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use persistence::repositories::SettingsRepository;
use sqlx::PgPool;

/// Assignment and reminder email sender backed by the settings row.
pub struct EmailNotifier {
    settings: SettingsRepository,
}

impl EmailNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self {
            settings: SettingsRepository::new(pool),
        }
    }

    async fn load_settings(&self) -> Result<Settings, NotifyError> {
        self.settings
            .get_or_create()
            .await
            .map(Into::into)
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }

    fn transport(settings: &Settings) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let host = settings
            .smtp_host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or(NotifyError::NotConfigured)?;

        let builder = if settings.smtp_secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        // smtp_port is clamped on update, but older rows may predate that.
        let port = u16::try_from(settings.smtp_port).unwrap_or(587);
        let mut builder = builder.port(port);
        if let (Some(user), Some(password)) = (&settings.smtp_user, &settings.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }
        Ok(builder.build())
    }

    fn mailbox(name: Option<&str>, email: &str) -> Result<Mailbox, NotifyError> {
        let address: Address = email
            .parse()
            .map_err(|_| NotifyError::InvalidAddress(email.to_string()))?;
        Ok(Mailbox::new(name.map(str::to_string), address))
    }

    fn sender(settings: &Settings) -> Result<Mailbox, NotifyError> {
        let from = settings
            .email_from
            .as_deref()
            .or(settings.smtp_user.as_deref())
            .filter(|f| !f.is_empty())
            .ok_or(NotifyError::NotConfigured)?;
        Self::mailbox(Some(&settings.email_from_name), from)
    }

    async fn send(
        transport: &AsyncSmtpTransport<Tokio1Executor>,
        message: Message,
    ) -> Result<(), NotifyError> {
        transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }

    /// Sends a reminder to one pending participant.
    pub async fn send_reminder(
        &self,
        name: &str,
        email: &str,
        custom_message: Option<&str>,
    ) -> Result<(), NotifyError> {
        let settings = self.load_settings().await?;
        if !settings.smtp_configured() {
            tracing::info!(recipient = %email, "SMTP not configured, skipping reminder");
            return Err(NotifyError::NotConfigured);
        }

        let transport = Self::transport(&settings)?;
        let message = Message::builder()
            .from(Self::sender(&settings)?)
            .to(Self::mailbox(Some(name), email)?)
            .subject(format!("{}: don't forget to draw!", settings.homepage_title))
            .header(ContentType::TEXT_PLAIN)
            .body(reminder_body(&settings, name, custom_message))
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Self::send(&transport, message).await?;
        tracing::info!(recipient = %email, "Reminder email sent");
        Ok(())
    }

    /// Sends a test email so an admin can verify the SMTP settings
    /// actually deliver before the draw opens.
    pub async fn send_test(&self, to_email: &str) -> Result<(), NotifyError> {
        let settings = self.load_settings().await?;
        if !settings.smtp_configured() {
            tracing::info!(recipient = %to_email, "SMTP not configured, test email skipped");
            return Err(NotifyError::NotConfigured);
        }

        let transport = Self::transport(&settings)?;
        let message = Message::builder()
            .from(Self::sender(&settings)?)
            .to(Self::mailbox(None, to_email)?)
            .subject(format!("{} test email", settings.homepage_title))
            .header(ContentType::TEXT_PLAIN)
            .body(test_body(&settings))
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Self::send(&transport, message).await?;
        tracing::info!(recipient = %to_email, "Test email sent");
        Ok(())
    }
}

#[async_trait]
impl AssignmentNotifier for EmailNotifier {
    async fn notify_assignment(&self, note: &AssignmentNotification) -> Result<(), NotifyError> {
        let settings = self.load_settings().await?;
        if !settings.smtp_configured() {
            tracing::info!(
                giver = %note.giver_email,
                receiver = %note.receiver_name,
                "SMTP not configured, assignment email not sent"
            );
            return Err(NotifyError::NotConfigured);
        }

        let transport = Self::transport(&settings)?;
        let sender = Self::sender(&settings)?;

        let message = Message::builder()
            .from(sender.clone())
            .to(Self::mailbox(Some(&note.giver_name), &note.giver_email)?)
            .subject(settings.email_subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(assignment_body(&settings, note))
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Self::send(&transport, message).await?;
        tracing::info!(giver = %note.giver_email, "Assignment email sent");

        // HR gets a copy of the pairing for record keeping. A failure
        // here doesn't undo the giver's notification.
        if let Some(hr_email) = settings.hr_email.as_deref().filter(|e| !e.is_empty()) {
            let hr_result = Self::mailbox(None, hr_email).and_then(|to| {
                Message::builder()
                    .from(sender)
                    .to(to)
                    .subject(format!("[Record] {}", settings.email_subject))
                    .header(ContentType::TEXT_PLAIN)
                    .body(hr_copy_body(&settings, note))
                    .map_err(|e| NotifyError::SendFailed(e.to_string()))
            });
            match hr_result {
                Ok(message) => {
                    if let Err(e) = Self::send(&transport, message).await {
                        tracing::warn!(hr = %hr_email, error = %e, "HR copy failed");
                    }
                }
                Err(e) => tracing::warn!(hr = %hr_email, error = %e, "HR copy not built"),
            }
        }

        Ok(())
    }
}

fn assignment_body(settings: &Settings, note: &AssignmentNotification) -> String {
    format!(
        "Hi {giver},\n\n\
         The {org} draw is in: you are {receiver}'s Secret Santa this year!\n\n\
         Keep it a secret and happy gifting.\n\n\
         {footer}\n",
        giver = note.giver_name,
        org = settings.organization_name,
        receiver = note.receiver_name,
        footer = settings.email_footer,
    )
}

fn hr_copy_body(settings: &Settings, note: &AssignmentNotification) -> String {
    format!(
        "Record of a {org} Secret Santa pairing:\n\n\
         Giver: {giver} <{giver_email}>\n\
         Receiver: {receiver}\n",
        org = settings.organization_name,
        giver = note.giver_name,
        giver_email = note.giver_email,
        receiver = note.receiver_name,
    )
}

fn test_body(settings: &Settings) -> String {
    format!(
        "This is a test email from the {org} Secret Santa application.\n\n\
         If you are reading this, the SMTP settings are working.\n\n\
         {footer}\n",
        org = settings.organization_name,
        footer = settings.email_footer,
    )
}

fn reminder_body(settings: &Settings, name: &str, custom_message: Option<&str>) -> String {
    let nudge = custom_message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("The draw is waiting for you, so log in and pick your name!");
    format!(
        "Hi {name},\n\n\
         You haven't drawn your {org} Secret Santa yet.\n\n\
         {nudge}\n\n\
         {footer}\n",
        name = name,
        org = settings.organization_name,
        nudge = nudge,
        footer = settings.email_footer,
    )
}
