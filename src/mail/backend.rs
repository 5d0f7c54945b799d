//! E-mail delivery backends.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{EmailMessage, MailError};
use crate::config::MailConfig;

/// Something that can deliver e-mail.
#[async_trait]
pub trait EmailBackend: Send + Sync {
    /// Deliver the messages, returning how many were sent.
    async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailError>;
}

/// Writes messages to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleBackend;

#[async_trait]
impl EmailBackend for ConsoleBackend {
    async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailError> {
        for message in messages {
            info!(
                from = %message.from,
                to = %message.to.join(", "),
                subject = %message.subject,
                "E-mail message\n{}",
                message.body
            );
        }
        Ok(messages.len())
    }
}

/// Keeps sent messages in memory.
///
/// Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MemoryBackend {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message sent so far.
    pub async fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl EmailBackend for MemoryBackend {
    async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailError> {
        self.outbox.lock().await.extend_from_slice(messages);
        Ok(messages.len())
    }
}

/// Sends messages through an SMTP relay.
pub struct SmtpBackend {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpBackend {
    /// Build a transport from the mail settings.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let mut builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };
        builder = builder.port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    fn build_message(message: &EmailMessage) -> Result<Message, MailError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))?;

        let mut builder = Message::builder().from(from).subject(&message.subject);
        for to in &message.to {
            let mailbox: Mailbox = to
                .parse()
                .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))?;
            builder = builder.to(mailbox);
        }

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailBackend for SmtpBackend {
    async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailError> {
        let mut sent = 0;
        for message in messages {
            let email = Self::build_message(message)?;
            self.transport
                .send(email)
                .await
                .map_err(|e| MailError::Transport(e.to_string()))?;
            debug!(to = %message.to.join(", "), "Sent e-mail via SMTP");
            sent += 1;
        }
        Ok(sent)
    }
}
