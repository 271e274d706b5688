//! fugu-cipher: Blowfish block cipher with ECB, CBC and CFB chaining
//!
//! Pipeline: secret key → key schedule (once per key) → chaining engine → 8-byte blocks
//!
//! ```text
//! Secret Key (1..=56 bytes)
//!   └── KeySchedule (18 P subkeys + 4×256 S-boxes, immutable, shareable via Arc)
//!       └── Cipher (one chaining register per stream, resettable to its IV)
//!           ├── ECB: block-by-block, no register
//!           ├── CBC: encrypt(plain ^ register), register = ciphertext
//!           └── CFB: plain ^ encrypt(register), register = ciphertext
//! ```
//!
//! Raw buffers must be a multiple of [`BLOCK_SIZE`]. The padded and string
//! entry points use PKCS#7-style padding and accept any length.
//!
//! ```
//! use fugu_cipher::{ChainBlock, Cipher, Mode};
//!
//! let key = b"an example key";
//! let iv = ChainBlock::new(0x0102_0304, 0x0506_0708);
//!
//! let mut enc = Cipher::with_chain(key, iv).unwrap();
//! let mut buf = *b"sixteen byte msg";
//! enc.encrypt_in_place(&mut buf, Mode::Cbc).unwrap();
//!
//! let mut dec = Cipher::with_chain(key, iv).unwrap();
//! dec.decrypt_in_place(&mut buf, Mode::Cbc).unwrap();
//! assert_eq!(&buf, b"sixteen byte msg");
//! ```

pub mod block;
pub mod cipher;
pub mod consts;
pub mod error;
pub mod mode;
pub mod padding;
pub mod schedule;

pub use block::ChainBlock;
pub use cipher::Cipher;
pub use error::{CipherError, CipherResult};
pub use mode::Mode;
pub use schedule::KeySchedule;

/// Block size in bytes (64-bit blocks)
pub const BLOCK_SIZE: usize = 8;

/// Shortest accepted key, in bytes
pub const MIN_KEY_LEN: usize = 1;

/// Longest accepted key, in bytes (448 bits)
pub const MAX_KEY_LEN: usize = 56;
