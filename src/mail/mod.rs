//! Outgoing e-mail.
//!
//! Messages are handed to an [`EmailBackend`] chosen by the `[mail]`
//! configuration section:
//! - `console` logs each message
//! - `memory` keeps messages in an in-process outbox
//! - `smtp` relays through an SMTP server

mod backend;
mod message;

use std::sync::Arc;

use thiserror::Error;

pub use backend::{ConsoleBackend, EmailBackend, MemoryBackend, SmtpBackend};
pub use message::EmailMessage;

use crate::config::{MailBackendKind, MailConfig};

/// Mail errors.
#[derive(Error, Debug)]
pub enum MailError {
    /// An address could not be parsed.
    #[error("invalid address: {0}")]
    Address(String),

    /// The message could not be assembled.
    #[error("message build failed: {0}")]
    Build(String),

    /// The transport failed to deliver.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Create the backend selected in the configuration.
pub fn backend_from_config(config: &MailConfig) -> Result<Arc<dyn EmailBackend>, MailError> {
    let backend: Arc<dyn EmailBackend> = match config.backend {
        MailBackendKind::Console => Arc::new(ConsoleBackend),
        MailBackendKind::Memory => Arc::new(MemoryBackend::new()),
        MailBackendKind::Smtp => Arc::new(SmtpBackend::new(config)?),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_backend_from_config() {
        let config = MailConfig {
            backend: MailBackendKind::Memory,
            ..MailConfig::default()
        };
        let backend = backend_from_config(&config).unwrap();
        let msg = EmailMessage::new("a@b.cc", "d@e.ff", "s", "b");
        assert_eq!(backend.send_messages(&[msg]).await.unwrap(), 1);
    }

    #[test]
    fn test_default_backend_is_console() {
        assert!(backend_from_config(&MailConfig::default()).is_ok());
    }
}
