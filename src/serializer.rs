//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different format (RON, MessagePack, etc.).

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts the ordered product list to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a sequence of items to bytes, keeping their order.
    fn serialize<T>(&self, items: &[T]) -> Result<Vec<u8>>
    where
        T: Serialize;

    /// Decode bytes back into a sequence.
    fn deserialize<T>(&self, bytes: &[u8]) -> Result<Vec<T>>
    where
        T: DeserializeOwned;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Whether output is indented.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Serializer for JsonSerializer {
    fn serialize<T>(&self, items: &[T]) -> Result<Vec<u8>>
    where
        T: Serialize,
    {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(items)
        } else {
            serde_json::to_vec(items)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
