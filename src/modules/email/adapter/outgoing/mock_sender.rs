use crate::modules::email::application::ports::outgoing::EmailSender;
use async_trait::async_trait;
use std::sync::Mutex;

/// Test double that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<RecordedEmail>>,
    pub fail: bool,
}

#[derive(Debug, Clone)]
pub struct RecordedEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl RecordingEmailSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        if self.fail {
            return Err("SMTP connection failed".to_string());
        }
        self.sent.lock().unwrap().push(RecordedEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
