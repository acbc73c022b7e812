//! Mail collaborator used by the email strategy
//!
//! The email strategy only hands payloads to an [`AsyncSender`]; delivery,
//! retries and transport live behind that trait. With the `async-email`
//! feature, [`TokioMailSender`] provides a tokio-backed sender on top of any
//! [`MailTransport`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "async-email")]
mod tokio_sender;

#[cfg(feature = "async-email")]
pub use tokio_sender::{MailTransport, TokioMailSender};

/// Data key carrying the raw record in email payloads
pub const DATA_KEY: &str = "Data";

/// Envelope of an outgoing mail
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
}

impl MailMessage {
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Vec::new(),
            subject: subject.into(),
        }
    }

    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }
}

/// Values substituted into a [`MessageTemplate`]
pub type EmailData = BTreeMap<String, String>;

/// Mail body with `{{Key}}` placeholders
///
/// Templates are HTML. Substituted values are escaped (`&`, `<`, `>`, `"`
/// and `'`); the template text itself is copied as written.
///
/// ```
/// use alog::mail::{EmailData, MessageTemplate};
///
/// let template = MessageTemplate::new("<pre>{{Data}}</pre>");
/// let mut data = EmailData::new();
/// data.insert("Data".to_string(), "disk full".to_string());
/// assert_eq!(template.render(&data), "<pre>disk full</pre>");
///
/// data.insert("Data".to_string(), "<script>".to_string());
/// assert_eq!(template.render(&data), "<pre>&lt;script&gt;</pre>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    source: String,
}

impl MessageTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace every `{{Key}}` (whitespace inside the braces allowed) with
    /// its escaped value; unknown keys render as empty text.
    pub fn render(&self, data: &EmailData) -> String {
        let mut output = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = after[..end].trim().trim_start_matches('.');
                    if let Some(value) = data.get(key) {
                        push_escaped(&mut output, value);
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);
        output
    }
}

fn push_escaped(output: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(format!("{{{{{}}}}}", DATA_KEY))
    }
}

/// Everything needed to build and deliver one mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailPayload {
    pub message: MailMessage,
    pub template: MessageTemplate,
    pub data: EmailData,
}

impl MailPayload {
    pub fn body(&self) -> String {
        self.template.render(&self.data)
    }
}

/// Fire-and-forget mail submission
pub trait AsyncSender: Send + Sync {
    fn send_async(&self, payload: MailPayload);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(value: &str) -> EmailData {
        let mut data = EmailData::new();
        data.insert(DATA_KEY.to_string(), value.to_string());
        data
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let template = MessageTemplate::new("Error report:\n{{ .Data }}\n-- {{Missing}}end");
        assert_eq!(
            template.render(&data("ts;boom\n")),
            "Error report:\nts;boom\n\n-- end"
        );
    }

    #[test]
    fn test_render_keeps_unterminated_braces() {
        let template = MessageTemplate::new("a {{Data}} b {{oops");
        assert_eq!(template.render(&data("x")), "a x b {{oops");
    }

    #[test]
    fn test_render_escapes_values_not_template() {
        let template = MessageTemplate::new("<pre class=\"log\">{{Data}}</pre>");
        assert_eq!(
            template.render(&data(r#"ts;<b>"R&D"</b> isn't ok"#)),
            "<pre class=\"log\">ts;&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt; isn&#39;t ok</pre>"
        );
    }

    #[test]
    fn test_default_template_is_raw_data() {
        assert_eq!(MessageTemplate::default().source(), "{{Data}}");
        assert_eq!(MessageTemplate::default().render(&data("raw")), "raw");
    }

    #[test]
    fn test_message_builder() {
        let message = MailMessage::new("alog@example.com", "Errors")
            .to("ops@example.com")
            .to("dev@example.com");
        assert_eq!(message.to.len(), 2);
        assert_eq!(message.subject, "Errors");
    }
}
