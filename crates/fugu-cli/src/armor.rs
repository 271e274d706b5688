//! Base64 armor for ciphertext in textual transport

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as B64, Engine};

/// Line width of armored output
const LINE_WIDTH: usize = 76;

/// Encode `data` as base64, wrapped at 76 columns, ending with a newline.
pub fn encode(data: &[u8]) -> String {
    let encoded = B64.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / LINE_WIDTH + 1);
    for line in encoded.as_bytes().chunks(LINE_WIDTH) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out
}

/// Decode armored text, ignoring any ASCII whitespace.
pub fn decode(text: &[u8]) -> Result<Vec<u8>> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    B64.decode(compact).context("base64 decode ciphertext")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let data: Vec<u8> = (0..=255).collect();
        let text = encode(&data);
        assert!(text.lines().all(|l| l.len() <= LINE_WIDTH));
        assert_eq!(decode(text.as_bytes()).unwrap(), data);
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode(b"\n").unwrap(), b"");
    }

    #[test]
    fn test_decode_tolerates_crlf() {
        let text = "iKQfO/8g\r\n";
        assert_eq!(decode(text.as_bytes()).unwrap(), vec![0x88, 0xA4, 0x1F, 0x3B, 0xFF, 0x20]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"not base64!").is_err());
    }
}
