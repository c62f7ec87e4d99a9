//! Environment-driven settings for runs against the live service.

use crate::types::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

pub const BASE_URL_VAR: &str = "PETFRIENDS_BASE_URL";
pub const EMAIL_VAR: &str = "PETFRIENDS_EMAIL";
pub const PASSWORD_VAR: &str = "PETFRIENDS_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub credentials: Credentials,
}

impl Settings {
    /// Settings from the process environment, or `None` when either
    /// credential is missing or empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let email = non_empty(EMAIL_VAR)?;
        let password = non_empty(PASSWORD_VAR)?;
        let base_url = non_empty(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Some(Self {
            base_url,
            credentials: Credentials::new(email, password),
        })
    }
}
