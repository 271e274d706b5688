//! 64-bit block as a pair of 32-bit halves

use std::ops::{BitXor, BitXorAssign};

use serde::{Deserialize, Serialize};

use crate::BLOCK_SIZE;

/// One 64-bit block, split into the two Feistel halves.
///
/// Also used as the chaining register (IV) for CBC and CFB.
/// Bytes map onto the halves big-endian: `bytes[0..4]` is `left`,
/// `bytes[4..8]` is `right`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainBlock {
    pub left: u32,
    pub right: u32,
}

impl ChainBlock {
    pub const fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }

    pub fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Self {
        Self {
            left: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            right: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    pub fn to_bytes(self) -> [u8; BLOCK_SIZE] {
        let mut out = [0u8; BLOCK_SIZE];
        out[0..4].copy_from_slice(&self.left.to_be_bytes());
        out[4..8].copy_from_slice(&self.right.to_be_bytes());
        out
    }

    /// Read a block from the first 8 bytes of `chunk`.
    ///
    /// Callers pass chunks from `chunks_exact(BLOCK_SIZE)`.
    pub(crate) fn read(chunk: &[u8]) -> Self {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes.copy_from_slice(&chunk[..BLOCK_SIZE]);
        Self::from_bytes(&bytes)
    }

    pub(crate) fn write(self, chunk: &mut [u8]) {
        chunk[..BLOCK_SIZE].copy_from_slice(&self.to_bytes());
    }
}

impl From<u64> for ChainBlock {
    fn from(v: u64) -> Self {
        Self::new((v >> 32) as u32, v as u32)
    }
}

impl From<ChainBlock> for u64 {
    fn from(b: ChainBlock) -> Self {
        (u64::from(b.left) << 32) | u64::from(b.right)
    }
}

impl BitXor for ChainBlock {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self::new(self.left ^ rhs.left, self.right ^ rhs.right)
    }
}

impl BitXorAssign for ChainBlock {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.left ^= rhs.left;
        self.right ^= rhs.right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_layout() {
        let block = ChainBlock::from_bytes(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
        assert_eq!(block.left, 0x0123_4567);
        assert_eq!(block.right, 0x89AB_CDEF);
        assert_eq!(u64::from(block), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let block = ChainBlock::new(0xFEDC_BA98, 0x7654_3210);
        assert_eq!(ChainBlock::from_bytes(&block.to_bytes()), block);
        assert_eq!(ChainBlock::from(0xFEDC_BA98_7654_3210u64), block);
    }

    #[test]
    fn test_xor() {
        let a = ChainBlock::new(0xFFFF_0000, 0x0F0F_0F0F);
        let b = ChainBlock::new(0x00FF_FF00, 0xFFFF_FFFF);
        let mut c = a;
        c ^= b;
        assert_eq!(c, ChainBlock::new(0xFF00_FF00, 0xF0F0_F0F0));
        assert_eq!(a ^ b, c);
        assert_eq!(c ^ b, a);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(ChainBlock::default(), ChainBlock::new(0, 0));
    }
}
