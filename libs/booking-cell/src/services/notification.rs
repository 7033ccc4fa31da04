// libs/booking-cell/src/services/notification.rs
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;

/// Client for the HTTP mail relay that delivers booking notifications.
/// Delivery failures are reported to the caller, which decides whether they
/// are fatal; the accept flow treats them as non-fatal.
pub struct MailerClient {
    client: Client,
    relay_url: String,
    relay_token: String,
    sender: String,
    configured: bool,
}

impl MailerClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            relay_url: config.mail_relay_url.clone(),
            relay_token: config.mail_relay_token.clone(),
            sender: config.sender_email.clone(),
            configured: config.is_mailer_configured(),
        }
    }

    pub async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        if !self.configured {
            return Err(anyhow!("mail relay not configured"));
        }

        let url = format!("{}/messages", self.relay_url);
        debug!("Sending notification email to {}", to);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.relay_token))
            .json(&json!({
                "from": self.sender,
                "to": to,
                "subject": subject,
                "html": html_body,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Mail relay error ({}): {}", status, body);
            return Err(anyhow!("mail relay error ({}): {}", status, body));
        }

        info!("Notification email sent to {}", to);
        Ok(())
    }
}
