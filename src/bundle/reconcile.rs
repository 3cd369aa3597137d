//! Matching a decoded bundle to its server side public key

use crate::client::AccountPublicKey;
use crate::error::{ClientError, Result};

/// Find the key whose PEM text equals `public_key`, ignoring surrounding whitespace.
///
/// The first match in `keys` order wins.
pub fn match_public_key(keys: Vec<AccountPublicKey>, public_key: &str) -> Result<AccountPublicKey> {
    let searched = public_key.trim();

    let mut candidates = Vec::with_capacity(keys.len());
    for key in keys {
        if key.public_key.trim() == searched {
            return Ok(key);
        }
        candidates.push(key.public_key.trim().to_string());
    }

    Err(ClientError::PublicKeyNotFound {
        searched: searched.to_string(),
        candidates,
    })
}
