//! Outgoing e-mail messages.

/// A plain-text e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender mailbox, e.g. `Boards <noreply@boards.local>`.
    pub from: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line (single line).
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl EmailMessage {
    /// Create a message to a single recipient.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let subject: String = subject.into();
        Self {
            from: from.into(),
            to: vec![to.into()],
            // Headers must not contain newlines.
            subject: subject.lines().collect::<Vec<_>>().join(" "),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_is_single_line() {
        let msg = EmailMessage::new("a@b.c", "d@e.f", "Hello\nworld", "body");
        assert_eq!(msg.subject, "Hello world");
    }

    #[test]
    fn test_single_recipient() {
        let msg = EmailMessage::new("a@b.c", "d@e.f", "s", "b");
        assert_eq!(msg.to, vec!["d@e.f".to_string()]);
        assert_eq!(msg.from, "a@b.c");
    }
}
