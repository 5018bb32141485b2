use async_trait::async_trait;
use serde::Serialize;

use crate::core::config::MailConfig;
use crate::core::error::{AppError, Result};
use crate::modules::mail::{EmailMessage, Mailer};

/// SendGrid v3 `mail/send` request body
#[derive(Debug, Serialize)]
struct SendGridRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

/// Mailer backed by the SendGrid HTTP API
pub struct SendGridMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
    from_name: String,
}

impl SendGridMailer {
    pub fn new(config: &MailConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.sendgrid_api_url.clone(),
            api_key,
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let request = SendGridRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &message.to,
                    name: None,
                }],
            }],
            from: Address {
                email: &self.from_address,
                name: Some(&self.from_name),
            },
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/plain",
                value: &message.body,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("SendGrid request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "SendGrid returned {}: {}",
                status, body
            )));
        }

        tracing::debug!("Email '{}' sent to {}", message.subject, message.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = SendGridRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: "ada@example.com",
                    name: None,
                }],
            }],
            from: Address {
                email: "no-reply@wastewatch.local",
                name: Some("WasteWatch"),
            },
            subject: "Verify your email",
            content: vec![Content {
                content_type: "text/plain",
                value: "hello",
            }],
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["personalizations"][0]["to"][0]["email"], "ada@example.com");
        assert!(body["personalizations"][0]["to"][0].get("name").is_none());
        assert_eq!(body["from"]["name"], "WasteWatch");
        assert_eq!(body["content"][0]["type"], "text/plain");
    }
}
