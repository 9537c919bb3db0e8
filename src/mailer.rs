use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;

use crate::configuration::SmtpSettings;

/// Delivers plain-text notifications to the configured recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), anyhow::Error>;
}

#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpMailer {
    /// The relay is upgraded with STARTTLS and authenticated with the configured
    /// credentials. No connection is opened until the first message is sent.
    ///
    /// The transport pools its connections on a background task, so this must
    /// be called from within a Tokio runtime.
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self, anyhow::Error> {
        let sender = settings
            .sender
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid sender address {}", settings.sender))?;
        let recipient = settings
            .recipient
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid recipient address {}", settings.recipient))?;

        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .context("Failed to configure the SMTP relay")?
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(settings.timeout()))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }

    pub fn compose(&self, subject: &str, body: &str) -> Result<Message, lettre::error::Error> {
        Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(name = "Send email over SMTP", skip(self, body))]
    async fn send(&self, subject: &str, body: &str) -> Result<(), anyhow::Error> {
        let message = self
            .compose(subject, body)
            .context("Failed to build the email message")?;
        self.transport
            .send(message)
            .await
            .context("Failed to send email over SMTP")?;
        Ok(())
    }
}
