//! Email notification channel.
//!
//! Currently a stub that prints the would-be delivery to stdout. A real
//! SMTP backend must bound its own delivery time; the pipeline imposes no
//! timeout on `deliver`.

use crate::core::Notifier;
use async_trait::async_trait;

pub struct EmailNotifier {
    address: String,
}

impl EmailNotifier {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn deliver(&self, message: &str) -> anyhow::Result<usize> {
        println!("Sending email to {}", self.address);
        println!("{message}");
        Ok(message.len())
    }
}
