//! Queue items and payload helpers.

use super::error::QueueError;
use super::key::{KEY_WIDTH, encode_id};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single entry of the queue.
///
/// Items are created by [`Queue::enqueue`](crate::Queue::enqueue) and read
/// back by [`Queue::dequeue`](crate::Queue::dequeue). The payload is stored
/// exactly as given; the helpers below only interpret it on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Sequence number assigned when the item was enqueued.
    pub id: u64,
    /// Store key the item is persisted under.
    pub key: [u8; KEY_WIDTH],
    /// The payload bytes.
    pub value: Vec<u8>,
}

impl Item {
    /// Build the item for `id` carrying `value`.
    #[must_use]
    pub fn new(id: u64, value: Vec<u8>) -> Self {
        Self {
            id,
            key: encode_id(id),
            value,
        }
    }

    /// Borrow the payload as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidUtf8`] if the payload is not UTF-8.
    pub fn as_str(&self) -> Result<&str, QueueError> {
        std::str::from_utf8(&self.value).map_err(|_| QueueError::InvalidUtf8)
    }

    /// Decode a payload written by
    /// [`Queue::enqueue_json`](crate::Queue::enqueue_json).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Serialization`] if the payload is not valid JSON
    /// for `T`.
    pub fn to_json<T: DeserializeOwned>(&self) -> Result<T, QueueError> {
        Ok(serde_json::from_slice(&self.value)?)
    }

    /// Decode a payload written by
    /// [`Queue::enqueue_object`](crate::Queue::enqueue_object).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Serialization`] if the payload is not a bincode
    /// encoding of `T`.
    #[cfg(feature = "bincode")]
    pub fn to_object<T: DeserializeOwned>(&self) -> Result<T, QueueError> {
        bincode::serde::decode_from_slice(&self.value, bincode::config::standard())
            .map(|(value, _read)| value)
            .map_err(|e| QueueError::Serialization {
                message: e.to_string(),
            })
    }
}

/// Encode `value` as a bincode payload.
#[cfg(feature = "bincode")]
pub(crate) fn encode_object<T: Serialize>(value: &T) -> Result<Vec<u8>, QueueError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard()).map_err(|e| {
        QueueError::Serialization {
            message: e.to_string(),
        }
    })
}
