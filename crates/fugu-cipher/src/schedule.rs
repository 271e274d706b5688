//! Key expansion and the 16-round Feistel block transform
//!
//! Derivation:
//! ```text
//! P_INIT, S_INIT (pi digits)
//!   ├── P[i] ^= key word i   (key bytes cycled, packed 4-per-word big-endian)
//!   └── running block (0,0) encrypted repeatedly with the in-progress tables,
//!       each result overwriting the next P pair, then S0..S3 pairs
//! ```
//!
//! Once derived, a schedule is never mutated; every block operation is a pure
//! read, so one schedule may be shared across threads.

use zeroize::Zeroize;

use crate::block::ChainBlock;
use crate::consts::{P_ENTRIES, P_INIT, S_ENTRIES, S_INIT};
use crate::error::{CipherError, CipherResult};
use crate::{MAX_KEY_LEN, MIN_KEY_LEN};

/// Number of Feistel rounds.
pub const ROUNDS: usize = 16;

/// Derived round subkeys (P-array) and key-dependent S-boxes.
///
/// Zeroized on drop.
pub struct KeySchedule {
    p: [u32; P_ENTRIES],
    s: [[u32; S_ENTRIES]; 4],
}

impl KeySchedule {
    /// Expand `key` (1 to 56 bytes) into a full schedule.
    pub fn derive(key: &[u8]) -> CipherResult<Self> {
        if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&key.len()) {
            return Err(CipherError::InvalidKeyLength { len: key.len() });
        }

        let mut schedule = Self {
            p: P_INIT,
            s: S_INIT,
        };
        schedule.mix_key(key);
        schedule.expand();

        tracing::debug!(key_len = key.len(), "derived key schedule");
        Ok(schedule)
    }

    /// XOR the P-array with the key, wrapping around the key as needed.
    fn mix_key(&mut self, key: &[u8]) {
        let mut k = 0;
        for subkey in self.p.iter_mut() {
            let mut word = 0u32;
            for _ in 0..4 {
                word = (word << 8) | u32::from(key[k]);
                k = (k + 1) % key.len();
            }
            *subkey ^= word;
        }
    }

    /// Replace every P and S entry, in order, with successive encryptions of
    /// a running block that starts at zero.
    fn expand(&mut self) {
        let mut block = ChainBlock::default();

        for i in (0..P_ENTRIES).step_by(2) {
            block = self.encrypt_block(block);
            self.p[i] = block.left;
            self.p[i + 1] = block.right;
        }

        for sbox in 0..4 {
            for i in (0..S_ENTRIES).step_by(2) {
                block = self.encrypt_block(block);
                self.s[sbox][i] = block.left;
                self.s[sbox][i + 1] = block.right;
            }
        }
    }

    /// Round function: `((S0[a] + S1[b]) ^ S2[c]) + S3[d]`, mod 2^32,
    /// where `a` is the most significant byte of `x`.
    #[inline]
    fn f(&self, x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        (self.s[0][a as usize].wrapping_add(self.s[1][b as usize]) ^ self.s[2][c as usize])
            .wrapping_add(self.s[3][d as usize])
    }

    /// Encrypt one block.
    pub fn encrypt_block(&self, block: ChainBlock) -> ChainBlock {
        let ChainBlock {
            mut left,
            mut right,
        } = block;

        for &subkey in &self.p[..ROUNDS] {
            left ^= subkey;
            right ^= self.f(left);
            std::mem::swap(&mut left, &mut right);
        }
        std::mem::swap(&mut left, &mut right);

        right ^= self.p[ROUNDS];
        left ^= self.p[ROUNDS + 1];
        ChainBlock::new(left, right)
    }

    /// Decrypt one block. Inverse of [`encrypt_block`](Self::encrypt_block).
    pub fn decrypt_block(&self, block: ChainBlock) -> ChainBlock {
        let ChainBlock {
            mut left,
            mut right,
        } = block;

        // P[17] down to P[2]
        for &subkey in self.p[2..].iter().rev() {
            left ^= subkey;
            right ^= self.f(left);
            std::mem::swap(&mut left, &mut right);
        }
        std::mem::swap(&mut left, &mut right);

        right ^= self.p[1];
        left ^= self.p[0];
        ChainBlock::new(left, right)
    }
}

impl Drop for KeySchedule {
    fn drop(&mut self) {
        self.p.zeroize();
        self.s.zeroize();
    }
}

impl std::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySchedule")
            .field("p", &"[REDACTED]")
            .field("s", &"[REDACTED]")
            .finish()
    }
}
