//! Plain-text email bodies rendered with Jinja2 syntax.
//!
//! Templates live in `templates/mail/` and are compiled into the binary.

use minijinja::{context, Environment};
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const VERIFY_EMAIL: &str = "verify_email.jinja";
const ROLE_CODE: &str = "role_code.jinja";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for (name, source) in [
        (
            VERIFY_EMAIL,
            include_str!("../../../templates/mail/verify_email.jinja"),
        ),
        (
            ROLE_CODE,
            include_str!("../../../templates/mail/role_code.jinja"),
        ),
    ] {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String, TemplateError> {
    get_environment()
        .get_template(name)
        .map_err(|_| TemplateError::NotFound(name.to_string()))?
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Body of the message carrying the email verification link
pub fn render_verify_email(
    full_name: &str,
    verify_link: &str,
    ttl_hours: u64,
) -> Result<String, TemplateError> {
    render(
        VERIFY_EMAIL,
        context! { full_name, verify_link, ttl_hours },
    )
}

/// Body of the message delivering an organization's role code
pub fn render_role_code(
    full_name: &str,
    user_type: &str,
    role_code: &str,
) -> Result<String, TemplateError> {
    render(ROLE_CODE, context! { full_name, user_type, role_code })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_email_contains_link() {
        let body = render_verify_email(
            "Ada",
            "http://localhost:5000/auth/verify-email?token=abc",
            24,
        )
        .unwrap();
        assert!(body.contains("Hello Ada"));
        assert!(body.contains("verify-email?token=abc"));
        assert!(body.contains("24 hours"));
    }

    #[test]
    fn test_role_code_contains_code() {
        let body = render_role_code("Green Org", "NGO", "AB12CD34").unwrap();
        assert!(body.contains("AB12CD34"));
        assert!(body.contains("NGO account"));
    }
}
