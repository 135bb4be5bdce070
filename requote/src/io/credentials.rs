//! X API credentials from the environment.

use std::env;
use std::fmt;

pub const API_KEY_VAR: &str = "X_API_KEY";
pub const API_KEY_SECRET_VAR: &str = "X_API_KEY_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "X_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "X_ACCESS_TOKEN_SECRET";

/// OAuth 1.0a user-context credentials. All four are required.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_key_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// Returns `None` when any variable is missing or blank.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(mut lookup: F) -> Option<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Some(Self {
            api_key: get(API_KEY_VAR)?,
            api_key_secret: get(API_KEY_SECRET_VAR)?,
            access_token: get(ACCESS_TOKEN_VAR)?,
            access_token_secret: get(ACCESS_TOKEN_SECRET_VAR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn all_four_present_yields_credentials() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            (API_KEY_SECRET_VAR, "ks"),
            (ACCESS_TOKEN_VAR, "t"),
            (ACCESS_TOKEN_SECRET_VAR, "ts"),
        ]))
        .expect("credentials");
        assert_eq!(creds.api_key, "k");
        assert_eq!(creds.access_token_secret, "ts");
    }

    #[test]
    fn any_missing_value_yields_none() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            (API_KEY_SECRET_VAR, "ks"),
            (ACCESS_TOKEN_VAR, "t"),
        ]));
        assert!(creds.is_none());
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            (API_KEY_SECRET_VAR, "  "),
            (ACCESS_TOKEN_VAR, "t"),
            (ACCESS_TOKEN_SECRET_VAR, "ts"),
        ]));
        assert!(creds.is_none());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let creds = Credentials {
            api_key: "visible-key".to_string(),
            api_key_secret: "s".to_string(),
            access_token: "visible-token".to_string(),
            access_token_secret: "s".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("visible-key"));
        assert!(!rendered.contains("visible-token"));
    }
}
