use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;

/// Account category, decided at signup from the email domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
pub enum UserType {
    #[serde(rename = "general", alias = "General")]
    General,
    #[serde(rename = "NGO", alias = "ngo")]
    Ngo,
    #[serde(rename = "Government", alias = "government")]
    Government,
}

impl UserType {
    /// Classify an email address by its domain part.
    ///
    /// Domains are compared case-insensitively against the configured lists;
    /// anything that is not an organization domain is a general account.
    pub fn from_email(email: &str, ngo_domains: &[String], government_domains: &[String]) -> Self {
        let domain = email
            .rsplit_once('@')
            .map(|(_, d)| d.trim().to_lowercase())
            .unwrap_or_default();

        if ngo_domains.iter().any(|d| *d == domain) {
            UserType::Ngo
        } else if government_domains.iter().any(|d| *d == domain) {
            UserType::Government
        } else {
            UserType::General
        }
    }

    /// NGO and Government accounts log in with a role code and may claim reports
    pub fn is_organization(&self) -> bool {
        matches!(self, UserType::Ngo | UserType::Government)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::General => "general",
            UserType::Ngo => "NGO",
            UserType::Government => "Government",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(UserType::General),
            "ngo" => Ok(UserType::Ngo),
            "government" => Ok(UserType::Government),
            other => Err(format!("Unknown user type '{}'", other)),
        }
    }
}

/// Database model for user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub nickname: Option<String>,
    pub email: String,
    /// Empty for organization accounts
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub user_type: UserType,
    pub role_code: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub full_name: String,
    pub nickname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub role_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains() -> (Vec<String>, Vec<String>) {
        (vec!["ngo.com".to_string()], vec!["gov.com".to_string()])
    }

    #[test]
    fn test_from_email_classifies_by_domain() {
        let (ngo, gov) = domains();
        assert_eq!(UserType::from_email("team@ngo.com", &ngo, &gov), UserType::Ngo);
        assert_eq!(
            UserType::from_email("mayor@GOV.com", &ngo, &gov),
            UserType::Government
        );
        assert_eq!(
            UserType::from_email("jane@example.org", &ngo, &gov),
            UserType::General
        );
    }

    #[test]
    fn test_from_email_requires_exact_domain() {
        let (ngo, gov) = domains();
        assert_eq!(
            UserType::from_email("x@ngo.com.attacker.io", &ngo, &gov),
            UserType::General
        );
        assert_eq!(
            UserType::from_email("x@sub.gov.com", &ngo, &gov),
            UserType::General
        );
        assert_eq!(UserType::from_email("no-at-sign", &ngo, &gov), UserType::General);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Government".parse::<UserType>(), Ok(UserType::Government));
        assert_eq!("ngo".parse::<UserType>(), Ok(UserType::Ngo));
        assert_eq!("GENERAL".parse::<UserType>(), Ok(UserType::General));
        assert!("admin".parse::<UserType>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&UserType::Ngo).unwrap(), "\"NGO\"");
        let parsed: UserType = serde_json::from_str("\"government\"").unwrap();
        assert_eq!(parsed, UserType::Government);
    }

    #[test]
    fn test_is_organization() {
        assert!(UserType::Ngo.is_organization());
        assert!(UserType::Government.is_organization());
        assert!(!UserType::General.is_organization());
    }

    #[test]
    fn test_arbitrary_addresses_are_general() {
        use fake::faker::internet::en::SafeEmail;
        use fake::Fake;

        let (ngo, gov) = domains();
        for _ in 0..20 {
            let email: String = SafeEmail().fake();
            assert_eq!(UserType::from_email(&email, &ngo, &gov), UserType::General);
        }
    }
}
