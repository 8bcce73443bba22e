//! SMTP delivery of 2FA codes via `lettre`.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use courier_core::config::MailConfig;
use courier_core::error::CourierError;
use courier_core::traits::CodeSender;

/// Sends one-time codes over SMTP.
///
/// The recipient defaults to the sending account itself, which keeps the
/// single-operator setup to one mailbox.
pub struct SmtpCodeSender {
    host: String,
    port: u16,
    username: String,
    password: String,
    recipient: String,
}

impl SmtpCodeSender {
    pub fn new(config: &MailConfig) -> Self {
        let recipient = if config.recipient.is_empty() {
            config.username.clone()
        } else {
            config.recipient.clone()
        };
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.username.clone(),
            password: config.password.clone(),
            recipient,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, CourierError> {
        let creds = Credentials::new(self.username.clone(), self.password.clone());

        let transport = if self.port == 465 {
            // Implicit TLS (port 465)
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| CourierError::Mail(format!("SMTP relay setup failed: {e}")))?
                .port(self.port)
                .credentials(creds)
                .build()
        } else {
            // STARTTLS (port 587 or other)
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| CourierError::Mail(format!("SMTP relay setup failed: {e}")))?
                .port(self.port)
                .credentials(creds)
                .build()
        };

        Ok(transport)
    }
}

#[async_trait]
impl CodeSender for SmtpCodeSender {
    async fn send_code(&self, code: &str) -> Result<(), CourierError> {
        if !self.is_configured() {
            warn!("SMTP credentials missing, cannot send 2FA code");
            return Err(CourierError::Mail(
                "SMTP credentials not configured".to_string(),
            ));
        }

        let from: Mailbox = self
            .username
            .parse()
            .map_err(|e| CourierError::Mail(format!("invalid sender address: {e}")))?;
        let to: Mailbox = self
            .recipient
            .parse()
            .map_err(|e| CourierError::Mail(format!("invalid recipient address: {e}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(code_subject(code))
            .body(code_body(code))
            .map_err(|e| CourierError::Mail(format!("failed to build email: {e}")))?;

        let transport = self.build_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| CourierError::Mail(format!("SMTP send failed: {e}")))?;

        info!(to = %self.recipient, "2FA code sent via SMTP");
        Ok(())
    }
}

/// The code goes into the subject so it shows up in notification previews.
fn code_subject(code: &str) -> String {
    format!("Telegram Bot 2FA: {code}")
}

fn code_body(code: &str) -> String {
    format!(
        "Your 2FA code for the Telegram bot:\n\n    {code}\n\n\
         Valid for 10 minutes.\nEnter the code in the Telegram chat."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(username: &str, password: &str, recipient: &str) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: username.to_string(),
            password: password.to_string(),
            recipient: recipient.to_string(),
        }
    }

    #[test]
    fn test_recipient_defaults_to_username() {
        let sender = SmtpCodeSender::new(&config("bot@example.com", "pw", ""));
        assert_eq!(sender.recipient, "bot@example.com");
    }

    #[test]
    fn test_explicit_recipient_wins() {
        let sender = SmtpCodeSender::new(&config("bot@example.com", "pw", "me@example.com"));
        assert_eq!(sender.recipient, "me@example.com");
    }

    #[test]
    fn test_is_configured() {
        assert!(SmtpCodeSender::new(&config("bot@example.com", "pw", "")).is_configured());
        assert!(!SmtpCodeSender::new(&config("", "pw", "")).is_configured());
        assert!(!SmtpCodeSender::new(&config("bot@example.com", "", "")).is_configured());
    }

    #[tokio::test]
    async fn test_send_without_credentials_fails() {
        let sender = SmtpCodeSender::new(&config("", "", ""));
        let err = sender.send_code("123456").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_code_appears_in_subject_and_body() {
        assert!(code_subject("042137").contains("042137"));
        let body = code_body("042137");
        assert!(body.contains("042137"));
        assert!(body.contains("10 minutes"));
    }
}
