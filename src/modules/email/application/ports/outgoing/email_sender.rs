use async_trait::async_trait;

/// Fire-and-forget outbound mail. Callers decide whether a failure is fatal.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String>;
}
