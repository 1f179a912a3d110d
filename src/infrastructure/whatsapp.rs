use async_trait::async_trait;
use serde_json::json;

use crate::domain::errors::DomainError;
use crate::domain::ports::{InvoiceNotice, MessageSender, MessagingCredentials};

pub const DEFAULT_API_URL: &str = "https://graph.facebook.com/v17.0";

/// Sends invoice notices as WhatsApp Cloud API text messages.
#[derive(Debug, Clone)]
pub struct WhatsAppSender {
    http: reqwest::Client,
    api_url: String,
}

impl WhatsAppSender {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self, sender_id: &str) -> String {
        format!("{}/{}/messages", self.api_url, sender_id)
    }
}

/// Formats rupees the way en-IN does: lakh/crore grouping, at most two
/// decimals, trailing zeros dropped.
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, last_three) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (front, pair) = rest.split_at(rest.len() - 2);
            groups.push(pair);
            rest = front;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), last_three)
    };

    if fraction.is_empty() {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{fraction}")
    }
}

pub fn invoice_message(notice: &InvoiceNotice) -> String {
    format!(
        "Hey 👋 {},\nHere's your Qubex: BuyNDeliver™ order invoice.\nTotal: {} (Item + Delivery + Service Fee).\nDownload: {}\n— QuickBuy Boy Team 💛",
        notice.customer_name,
        format_inr(notice.total_amount),
        notice.pdf_url,
    )
}

#[async_trait]
impl MessageSender for WhatsAppSender {
    async fn send_invoice_notice(
        &self,
        notice: &InvoiceNotice,
        credentials: &MessagingCredentials,
    ) -> Result<(), DomainError> {
        let body = json!({
            "messaging_product": "whatsapp",
            "to": notice.phone_number,
            "type": "text",
            "text": { "body": invoice_message(notice) },
        });

        let response = self
            .http
            .post(self.messages_url(&credentials.sender_id))
            .bearer_auth(&credentials.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            log::warn!("WhatsApp API rejected message ({status}): {detail}");
            return Err(DomainError::Delivery(format!(
                "messaging API returned {status}"
            )));
        }

        log::info!("Invoice notice sent to {}", notice.phone_number);
        Ok(())
    }
}
