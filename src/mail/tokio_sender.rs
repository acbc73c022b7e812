//! Tokio-backed mail sender
//!
//! Payloads are queued on an unbounded channel and delivered by a task on
//! the given runtime, retrying failed deliveries with a linear backoff.

use super::{AsyncSender, MailMessage, MailPayload};
use crate::core::diagnostics::{Diagnostic, SharedDiagnostics};
use crate::core::{LoggerError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Transport performing the actual delivery (SMTP, HTTP API, ...)
///
/// # Example
///
/// ```no_run
/// use alog::mail::{MailMessage, MailTransport};
/// use alog::Result;
/// use async_trait::async_trait;
///
/// struct StdoutTransport;
///
/// #[async_trait]
/// impl MailTransport for StdoutTransport {
///     async fn deliver(&self, message: &MailMessage, body: &str) -> Result<()> {
///         println!("to {:?}: {}", message.to, body);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn deliver(&self, message: &MailMessage, body: &str) -> Result<()>;
}

/// Sender delivering payloads from a background tokio task
#[derive(Clone)]
pub struct TokioMailSender {
    queue: mpsc::UnboundedSender<MailPayload>,
    diagnostics: SharedDiagnostics,
}

impl TokioMailSender {
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

    /// Start the delivery task on `handle`.
    ///
    /// Each payload is tried up to `attempts` times; a payload that still
    /// fails is reported to `diagnostics` and dropped.
    pub fn spawn<T: MailTransport>(
        handle: &Handle,
        transport: T,
        attempts: u32,
        backoff: Duration,
        diagnostics: SharedDiagnostics,
    ) -> Self {
        let (queue, mut receiver) = mpsc::unbounded_channel::<MailPayload>();
        let task_diagnostics = Arc::clone(&diagnostics);
        let attempts = attempts.max(1);

        handle.spawn(async move {
            while let Some(payload) = receiver.recv().await {
                if let Err(e) = deliver(&transport, &payload, attempts, backoff).await {
                    task_diagnostics.report(&Diagnostic::MailFailed {
                        error: e.to_string(),
                    });
                }
            }
        });

        Self { queue, diagnostics }
    }
}

async fn deliver<T: MailTransport>(
    transport: &T,
    payload: &MailPayload,
    attempts: u32,
    backoff: Duration,
) -> Result<()> {
    let body = payload.body();
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match transport.deliver(&payload.message, &body).await {
            Ok(()) => return Ok(()),
            Err(e) => last_error = e.to_string(),
        }
        if attempt < attempts {
            tokio::time::sleep(backoff * attempt).await;
        }
    }
    Err(LoggerError::mail_delivery(attempts, last_error))
}

impl AsyncSender for TokioMailSender {
    fn send_async(&self, payload: MailPayload) {
        if self.queue.send(payload).is_err() {
            self.diagnostics.report(&Diagnostic::MailFailed {
                error: "mail delivery task has stopped".to_string(),
            });
        }
    }
}
