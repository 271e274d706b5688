use thiserror::Error;

pub type CipherResult<T> = Result<T, CipherError>;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid key length: {len} bytes (expected 1..=56)")]
    InvalidKeyLength { len: usize },

    #[error("invalid buffer length: {len} bytes is not a multiple of the 8-byte block size")]
    InvalidBufferLength { len: usize },

    #[error("output buffer is {dst} bytes but input is {src} bytes")]
    LengthMismatch { src: usize, dst: usize },

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("invalid padding")]
    InvalidPadding,

    #[error("decrypted text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
