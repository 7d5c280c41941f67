//! Values exchanged with the crypto backend

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::Deserialize;
use std::fmt;

/// How a value returned by the backend is written back into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Text field
    #[default]
    String,
    /// Binary field (base64 text where the record has no binary type)
    Binary,
}

/// A plaintext or ciphertext payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    /// Text-biased payload
    Text(String),
    /// Byte-biased payload
    Bytes(Bytes),
}

impl Item {
    /// Decode a base64 string into a byte item
    pub fn from_base64(text: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(text).map(|raw| Item::Bytes(Bytes::from(raw)))
    }

    /// Payload as text; invalid UTF-8 is replaced
    pub fn as_text(&self) -> String {
        match self {
            Item::Text(text) => text.clone(),
            Item::Bytes(raw) => String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Payload as bytes
    pub fn as_bytes(&self) -> Bytes {
        match self {
            Item::Text(text) => Bytes::copy_from_slice(text.as_bytes()),
            Item::Bytes(raw) => raw.clone(),
        }
    }

    /// Payload as standard base64
    pub fn as_base64(&self) -> String {
        match self {
            Item::Text(text) => STANDARD.encode(text.as_bytes()),
            Item::Bytes(raw) => STANDARD.encode(raw),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        match self {
            Item::Text(text) => text.len(),
            Item::Bytes(raw) => raw.len(),
        }
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Text(text) => write!(f, "Text({})", text),
            Item::Bytes(raw) => write!(f, "Bytes({} bytes)", raw.len()),
        }
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Item::Text(text.to_string())
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Item::Text(text)
    }
}

impl From<Bytes> for Item {
    fn from(raw: Bytes) -> Self {
        Item::Bytes(raw)
    }
}

impl From<Vec<u8>> for Item {
    fn from(raw: Vec<u8>) -> Self {
        Item::Bytes(Bytes::from(raw))
    }
}
