use crate::models::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use strum::{Display, EnumString};

/// A login credential as held in the user collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    pub username: String,
    /// Password encoded with the deployment's [`PasswordScheme`]
    pub password: String,
}

impl UserCredential {
    /// Build a credential, encoding the password for storage
    pub fn new(username: impl Into<String>, password: &str, scheme: PasswordScheme) -> Self {
        Self {
            username: username.into(),
            password: scheme.encode(password),
        }
    }

    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert("username".to_string(), Value::String(self.username));
        doc.insert("password".to_string(), Value::String(self.password));
        doc
    }
}

/// How an entered password is encoded before it is compared with the stored one
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PasswordScheme {
    /// Stored and compared as entered. Kept for existing user collections.
    #[default]
    Plaintext,
    /// Lowercase hex SHA-256 digest
    Sha256,
}

impl PasswordScheme {
    pub fn encode(self, password: &str) -> String {
        match self {
            PasswordScheme::Plaintext => password.to_string(),
            PasswordScheme::Sha256 => format!("{:x}", Sha256::digest(password.as_bytes())),
        }
    }

    pub fn is_plaintext(self) -> bool {
        self == PasswordScheme::Plaintext
    }
}
