//! Order-preserving key encoding for queue sequence numbers.
//!
//! Every item is stored under the fixed-width big-endian encoding of its
//! sequence number. Big-endian is what makes raw byte comparison of two keys
//! agree with numeric comparison of the ids they encode, so the store's own
//! key order is the queue order.

use super::error::QueueError;

/// Width in bytes of every encoded key.
pub const KEY_WIDTH: usize = 8;

/// Encode a sequence number into its fixed-width store key.
#[must_use]
#[inline]
pub fn encode_id(id: u64) -> [u8; KEY_WIDTH] {
    id.to_be_bytes()
}

/// Decode a store key back into its sequence number.
///
/// # Errors
///
/// Returns [`QueueError::MalformedKey`] if `key` is not exactly
/// [`KEY_WIDTH`] bytes long.
#[inline]
pub fn decode_key(key: &[u8]) -> Result<u64, QueueError> {
    let bytes: [u8; KEY_WIDTH] = key
        .try_into()
        .map_err(|_| QueueError::MalformedKey { len: key.len() })?;
    Ok(u64::from_be_bytes(bytes))
}
