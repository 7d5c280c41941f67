//! Conversion between record leaves and backend items

use crate::error::{Result, TransformError};
use crate::item::{Encoding, Item};
use fieldcrypt_path::json::type_name;
use fieldcrypt_path::{Datum, Tree};
use serde_json::Value;

/// Leaf conversions a record flavor needs to take part in a transform
pub trait LeafCodec: Tree + Send + Sync {
    /// Item to send to the backend for the leaf at `path`
    fn to_item(&self, path: &str) -> Result<Item>;

    /// Leaf to write back for an item returned by the backend
    fn from_item(item: &Item, encoding: Encoding) -> Self;

    /// String form compared by conditions
    fn render(&self) -> String;
}

impl LeafCodec for Value {
    fn to_item(&self, path: &str) -> Result<Item> {
        match self {
            Value::String(text) => Ok(Item::Text(text.clone())),
            other => Err(TransformError::UnsupportedValue {
                path: path.to_string(),
                found: type_name(other),
            }),
        }
    }

    fn from_item(item: &Item, encoding: Encoding) -> Self {
        match encoding {
            Encoding::String => Value::String(item.as_text()),
            Encoding::Binary => Value::String(item.as_base64()),
        }
    }

    fn render(&self) -> String {
        match self {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

impl LeafCodec for Datum {
    fn to_item(&self, path: &str) -> Result<Item> {
        match self {
            Datum::String(text) => Ok(Item::Text(text.clone())),
            Datum::Bytes(raw) => Ok(Item::Bytes(raw.clone())),
            other => Err(TransformError::UnsupportedValue {
                path: path.to_string(),
                found: other.kind_name(),
            }),
        }
    }

    fn from_item(item: &Item, encoding: Encoding) -> Self {
        match encoding {
            Encoding::String => Datum::String(item.as_text()),
            Encoding::Binary => Datum::Bytes(item.as_bytes()),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    #[test]
    fn json_leaves() {
        assert_eq!(json!("plain").to_item("$.a").unwrap(), Item::from("plain"));
        assert!(matches!(
            json!(5).to_item("$.n"),
            Err(TransformError::UnsupportedValue { found: "number", .. })
        ));

        let item = Item::from(vec![1u8, 2, 3]);
        assert_eq!(Value::from_item(&item, Encoding::Binary), json!("AQID"));
        assert_eq!(Value::from_item(&Item::from("c"), Encoding::String), json!("c"));
    }

    #[test]
    fn datum_leaves() {
        let raw = Datum::Bytes(Bytes::from_static(b"xyz"));
        assert_eq!(
            raw.to_item("$.b").unwrap(),
            Item::Bytes(Bytes::from_static(b"xyz"))
        );
        assert!(Datum::Int32(1).to_item("$.i").is_err());
        assert_eq!(
            Datum::from_item(&Item::from("t"), Encoding::Binary),
            Datum::Bytes(Bytes::from_static(b"t"))
        );
    }

    #[test]
    fn render_strips_quotes_from_strings() {
        assert_eq!(json!("PLAINTEXT").render(), "PLAINTEXT");
        assert_eq!(json!(42).render(), "42");
        assert_eq!(json!(true).render(), "true");
        assert_eq!(Datum::from("PLAINTEXT").render(), "PLAINTEXT");
        assert_eq!(Datum::Int64(7).render(), "7");
    }
}
