//! PKCS#7-style padding to the 8-byte block size
//!
//! Always appends between 1 and 8 bytes, each holding the pad length, so the
//! original length is recoverable for any payload, including ones that end in
//! zero bytes.

use crate::error::{CipherError, CipherResult};
use crate::BLOCK_SIZE;

/// Return `data` extended to a non-empty multiple of [`BLOCK_SIZE`].
pub fn pad(data: &[u8]) -> Vec<u8> {
    let n = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);
    out.resize(data.len() + n, n as u8);
    out
}

/// Strip the padding added by [`pad`], in place.
pub fn unpad(data: &mut Vec<u8>) -> CipherResult<()> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::InvalidPadding);
    }

    let n = usize::from(data[data.len() - 1]);
    if n == 0 || n > BLOCK_SIZE {
        return Err(CipherError::InvalidPadding);
    }

    let body = data.len() - n;
    if data[body..].iter().any(|&b| usize::from(b) != n) {
        return Err(CipherError::InvalidPadding);
    }

    data.truncate(body);
    Ok(())
}
