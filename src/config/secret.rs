//! Secure credential handling using the secrecy crate
//!
//! AWS secret keys and session tokens are held in [`SecretString`], which
//! zeroes its memory on drop and redacts itself in `Debug` output. The value
//! is only reachable through `expose_secret()`, which the request signer calls
//! when it derives the signing key.
//!
//! # Example
//!
//! ```rust
//! use logship::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
//! println!("{:?}", key); // redacted
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Wraps a String in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wraps an optional String in an optional [`SecretString`]
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("test-secret-key".to_string());
        assert_eq!(secret.expose_secret(), "test-secret-key");
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(Some("token".to_string())).is_some());
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_value_is_empty() {
        assert!(SecretValue::from("  ".to_string()).is_empty());
        assert!(!SecretValue::from("x".to_string()).is_empty());
    }

    #[test]
    fn test_secret_serde() {
        #[derive(Serialize, Deserialize)]
        struct TestConfig {
            secret_access_key: SecretString,
        }

        let deserialized: TestConfig =
            serde_json::from_str(r#"{"secret_access_key":"abc123"}"#).unwrap();
        assert_eq!(deserialized.secret_access_key.expose_secret(), "abc123");
    }
}
