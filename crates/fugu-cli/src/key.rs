//! Key acquisition: `--key` / `FUGU_KEY` hex, or an interactive prompt

use anyhow::{Context, Result};
use fugu_cipher::{MAX_KEY_LEN, MIN_KEY_LEN};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Resolve the key bytes, prompting on the terminal if none was supplied.
pub fn resolve_key(supplied: Option<&SecretString>) -> Result<Zeroizing<Vec<u8>>> {
    match supplied {
        Some(hex_key) => decode_key(hex_key),
        None => {
            let entered = rpassword::prompt_password("key (hex): ").context("reading key from terminal")?;
            decode_key(&SecretString::from(entered))
        }
    }
}

/// Decode a hex key and check it against the accepted key length.
pub fn decode_key(hex_key: &SecretString) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = Zeroizing::new(
        hex::decode(hex_key.expose_secret().trim()).map_err(|e| anyhow::anyhow!("key is not valid hex: {e}"))?,
    );
    anyhow::ensure!(
        (MIN_KEY_LEN..=MAX_KEY_LEN).contains(&bytes.len()),
        "key must be {MIN_KEY_LEN} to {MAX_KEY_LEN} bytes, got {}",
        bytes.len()
    );
    tracing::debug!(key_len = bytes.len(), "key decoded");
    Ok(bytes)
}
