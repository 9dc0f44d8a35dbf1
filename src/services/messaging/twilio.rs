use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::MessagingProvider;

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct TwilioWhatsAppProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    client: reqwest::Client,
}

impl TwilioWhatsAppProvider {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            account_sid,
            auth_token,
            from_number,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

/// Twilio addresses WhatsApp endpoints as `whatsapp:+55...`. Inbound webhook
/// numbers already carry the prefix; config values may not.
fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}

#[async_trait]
impl MessagingProvider for TwilioWhatsAppProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let to = whatsapp_address(to);
        let from = whatsapp_address(&self.from_number);

        self.client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to.as_str()), ("From", from.as_str()), ("Body", body)])
            .send()
            .await
            .context("failed to send WhatsApp message")?
            .error_for_status()
            .context("Twilio API returned error")?;

        Ok(())
    }
}
