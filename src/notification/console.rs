//! Console notification channel: prints the message to stdout.

use crate::core::Notifier;
use async_trait::async_trait;

pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, message: &str) -> anyhow::Result<usize> {
        println!("{message}");
        Ok(message.len())
    }
}
