//! Email strategy implementation

use crate::core::{Result, Strategy};
use crate::mail::{AsyncSender, EmailData, MailMessage, MailPayload, MessageTemplate, DATA_KEY};
use std::sync::Arc;

/// Mails each record through an [`AsyncSender`].
///
/// The record is placed in the template data under `Data`. Submission is
/// fire-and-forget: delivery failures belong to the sender, so `write`
/// always succeeds.
pub struct EmailStrategy {
    sender: Arc<dyn AsyncSender>,
    message: MailMessage,
    template: MessageTemplate,
}

impl EmailStrategy {
    pub fn new(sender: Arc<dyn AsyncSender>, message: MailMessage, template: MessageTemplate) -> Self {
        Self {
            sender,
            message,
            template,
        }
    }

    pub fn message(&self) -> &MailMessage {
        &self.message
    }
}

impl Strategy for EmailStrategy {
    fn write(&mut self, message: &str) -> Result<usize> {
        let mut data = EmailData::new();
        data.insert(DATA_KEY.to_string(), message.to_string());

        self.sender.send_async(MailPayload {
            message: self.message.clone(),
            template: self.template.clone(),
            data,
        });
        Ok(message.len())
    }

    fn name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<MailPayload>>,
    }

    impl AsyncSender for Outbox {
        fn send_async(&self, payload: MailPayload) {
            self.sent.lock().push(payload);
        }
    }

    #[test]
    fn test_record_is_handed_to_sender() {
        let outbox = Arc::new(Outbox::default());
        let mut strategy = EmailStrategy::new(
            outbox.clone(),
            MailMessage::new("alog@example.com", "Error").to("ops@example.com"),
            MessageTemplate::new("<p>{{Data}}</p>"),
        );

        assert_eq!(strategy.write("ts;boom\n").unwrap(), 8);

        let sent = outbox.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].data.get(DATA_KEY).map(String::as_str), Some("ts;boom\n"));
        assert_eq!(sent[0].body(), "<p>ts;boom\n</p>");
        assert_eq!(sent[0].message.to, vec!["ops@example.com".to_string()]);
    }
}
