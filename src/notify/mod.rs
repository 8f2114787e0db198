//! Delivery of newly found postings.
//!
//! - `TelegramNotifier`: one Bot API message per posting
//! - `LogNotifier`: writes the messages to the log (dry runs)

pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Posting;

pub use telegram::TelegramNotifier;

/// Trait for notification channel implementations.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message per posting, in order.
    ///
    /// Stops at the first failed delivery and returns its error; postings
    /// after it are not sent.
    async fn notify(&self, postings: &[Posting]) -> Result<()>;

    /// Human-readable name for this channel.
    fn channel_name(&self) -> &str;
}

/// Notifier that only logs what would have been sent.
pub struct LogNotifier {
    template: String,
}

impl LogNotifier {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, postings: &[Posting]) -> Result<()> {
        for posting in postings {
            log::info!("[dry-run] {}", posting.format(&self.template));
        }
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}
