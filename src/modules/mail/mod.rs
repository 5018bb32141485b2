//! Outbound email: transport trait, providers and message templates.

mod mailer;
mod sendgrid;
pub mod templates;

pub use mailer::{EmailMessage, LogMailer, Mailer};
pub use sendgrid::SendGridMailer;

use crate::core::config::MailConfig;
use std::sync::Arc;

/// Pick the SendGrid transport when an API key is configured, otherwise log only
pub fn mailer_from_config(config: &MailConfig) -> Arc<dyn Mailer> {
    match &config.sendgrid_api_key {
        Some(key) => {
            tracing::info!("Mail delivery via SendGrid enabled");
            Arc::new(SendGridMailer::new(config, key.clone()))
        }
        None => {
            tracing::warn!("SENDGRID_API_KEY not set, outgoing mail will only be logged");
            Arc::new(LogMailer)
        }
    }
}
