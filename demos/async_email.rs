//! Email strategy example
//!
//! Errors are written to stderr and mailed through a tokio-backed sender.
//! The transport here prints instead of talking to a mail server.
//!
//! Run with: cargo run --example async_email --features async-email

use alog::mail::{MailMessage, MailTransport, MessageTemplate, TokioMailSender};
use alog::prelude::*;
use alog::ConsoleDiagnostics;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

struct PrintTransport;

#[async_trait]
impl MailTransport for PrintTransport {
    async fn deliver(&self, message: &MailMessage, body: &str) -> Result<()> {
        println!(
            "--- mail from {} to {:?}: {}\n{}",
            message.from, message.to, message.subject, body
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== alog - Email Example ===\n");

    let sender = TokioMailSender::spawn(
        &tokio::runtime::Handle::current(),
        PrintTransport,
        TokioMailSender::DEFAULT_ATTEMPTS,
        TokioMailSender::DEFAULT_BACKOFF,
        Arc::new(ConsoleDiagnostics),
    );
    let message = MailMessage::new("alerts@example.com", "Service error").to("oncall@example.com");
    let template = MessageTemplate::new("<h1>Service error</h1>\n<pre>{{ .Data }}</pre>");

    let log = Log::builder()
        .severity(
            Severity::Error,
            SeverityConfig::new(10)
                .strategy(ConsoleStrategy::stderr())
                .strategy(EmailStrategy::new(Arc::new(sender), message, template)),
        )
        .build()?;

    log.error(Some("payment provider unreachable"));
    log.shutdown(Duration::from_secs(5));

    // Give the delivery task time to run
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
