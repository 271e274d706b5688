//! Chaining engine: ECB, CBC and CFB over byte buffers
//!
//! Raw buffers must be a whole number of 8-byte blocks. Every length check
//! runs before the first byte is written, so a rejected call leaves both the
//! buffers and the chaining register untouched.
//!
//! The chaining register carries over between calls. Encrypting a stream in
//! several calls produces the same bytes as one call over the concatenation;
//! call [`Cipher::reset_chain`] to start a new stream from the IV.

use std::sync::Arc;

use crate::block::ChainBlock;
use crate::error::{CipherError, CipherResult};
use crate::mode::Mode;
use crate::padding;
use crate::schedule::KeySchedule;
use crate::BLOCK_SIZE;

/// A derived key schedule plus its own chaining register.
///
/// Cloning shares the schedule and copies the register, giving an
/// independent stream. A single `Cipher` is not meant to be shared between
/// threads mid-stream; give each thread its own clone instead.
#[derive(Debug, Clone)]
pub struct Cipher {
    schedule: Arc<KeySchedule>,
    chain0: ChainBlock,
    chain: ChainBlock,
}

impl Cipher {
    /// Derive a cipher from `key` with an all-zero IV.
    pub fn new(key: &[u8]) -> CipherResult<Self> {
        Self::with_chain(key, ChainBlock::default())
    }

    /// Derive a cipher from `key` with the given IV.
    pub fn with_chain(key: &[u8], iv: ChainBlock) -> CipherResult<Self> {
        let schedule = KeySchedule::derive(key)?;
        Ok(Self::from_schedule(Arc::new(schedule), iv))
    }

    /// Bind a fresh chaining register to an already derived schedule.
    pub fn from_schedule(schedule: Arc<KeySchedule>, iv: ChainBlock) -> Self {
        Self {
            schedule,
            chain0: iv,
            chain: iv,
        }
    }

    pub fn schedule(&self) -> &Arc<KeySchedule> {
        &self.schedule
    }

    /// The live chaining register.
    pub fn chain(&self) -> ChainBlock {
        self.chain
    }

    /// The IV the register resets to.
    pub fn initial_chain(&self) -> ChainBlock {
        self.chain0
    }

    /// Restore the chaining register to the IV.
    pub fn reset_chain(&mut self) {
        self.chain = self.chain0;
        tracing::trace!("chaining register reset");
    }

    /// Encrypt `buf` in place. `buf.len()` must be a multiple of 8.
    pub fn encrypt_in_place(&mut self, buf: &mut [u8], mode: Mode) -> CipherResult<()> {
        check_blocks(buf.len())?;
        tracing::trace!(%mode, len = buf.len(), "encrypt");
        self.apply_encrypt(buf, mode);
        Ok(())
    }

    /// Decrypt `buf` in place. `buf.len()` must be a multiple of 8.
    pub fn decrypt_in_place(&mut self, buf: &mut [u8], mode: Mode) -> CipherResult<()> {
        check_blocks(buf.len())?;
        tracing::trace!(%mode, len = buf.len(), "decrypt");
        self.apply_decrypt(buf, mode);
        Ok(())
    }

    /// Encrypt `src` into `dst`; both must have the same length, a multiple of 8.
    pub fn encrypt(&mut self, src: &[u8], dst: &mut [u8], mode: Mode) -> CipherResult<()> {
        check_pair(src, dst)?;
        dst.copy_from_slice(src);
        self.encrypt_in_place(dst, mode)
    }

    /// Decrypt `src` into `dst`; both must have the same length, a multiple of 8.
    pub fn decrypt(&mut self, src: &[u8], dst: &mut [u8], mode: Mode) -> CipherResult<()> {
        check_pair(src, dst)?;
        dst.copy_from_slice(src);
        self.decrypt_in_place(dst, mode)
    }

    /// Pad `plaintext` (see [`padding`]) and encrypt it. Accepts any length.
    pub fn encrypt_padded(&mut self, plaintext: &[u8], mode: Mode) -> Vec<u8> {
        let mut buf = padding::pad(plaintext);
        tracing::trace!(%mode, len = plaintext.len(), "encrypt padded");
        self.apply_encrypt(&mut buf, mode);
        buf
    }

    /// Decrypt output of [`encrypt_padded`](Self::encrypt_padded) and strip
    /// the padding.
    ///
    /// On a padding error the chaining register is restored to where it was
    /// before the call.
    pub fn decrypt_padded(&mut self, ciphertext: &[u8], mode: Mode) -> CipherResult<Vec<u8>> {
        check_blocks(ciphertext.len())?;
        tracing::trace!(%mode, len = ciphertext.len(), "decrypt padded");

        let saved = self.chain;
        let mut buf = ciphertext.to_vec();
        self.apply_decrypt(&mut buf, mode);
        if let Err(e) = padding::unpad(&mut buf) {
            self.chain = saved;
            return Err(e);
        }
        Ok(buf)
    }

    /// Encrypt text under ECB with padding. Never touches the chaining register.
    pub fn encrypt_string(&self, plaintext: &str) -> Vec<u8> {
        let mut buf = padding::pad(plaintext.as_bytes());
        self.ecb_encrypt(&mut buf);
        buf
    }

    /// Reverse [`encrypt_string`](Self::encrypt_string).
    pub fn decrypt_string(&self, ciphertext: &[u8]) -> CipherResult<String> {
        check_blocks(ciphertext.len())?;
        let mut buf = ciphertext.to_vec();
        self.ecb_decrypt(&mut buf);
        padding::unpad(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn apply_encrypt(&mut self, buf: &mut [u8], mode: Mode) {
        match mode {
            Mode::Ecb => self.ecb_encrypt(buf),
            Mode::Cbc => self.cbc_encrypt(buf),
            Mode::Cfb => self.cfb_encrypt(buf),
        }
    }

    fn apply_decrypt(&mut self, buf: &mut [u8], mode: Mode) {
        match mode {
            Mode::Ecb => self.ecb_decrypt(buf),
            Mode::Cbc => self.cbc_decrypt(buf),
            Mode::Cfb => self.cfb_decrypt(buf),
        }
    }

    fn ecb_encrypt(&self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
            let block = ChainBlock::read(chunk);
            self.schedule.encrypt_block(block).write(chunk);
        }
    }

    fn ecb_decrypt(&self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
            let block = ChainBlock::read(chunk);
            self.schedule.decrypt_block(block).write(chunk);
        }
    }

    fn cbc_encrypt(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
            let block = ChainBlock::read(chunk) ^ self.chain;
            self.chain = self.schedule.encrypt_block(block);
            self.chain.write(chunk);
        }
    }

    fn cbc_decrypt(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
            let crypt = ChainBlock::read(chunk);
            let plain = self.schedule.decrypt_block(crypt) ^ self.chain;
            self.chain = crypt;
            plain.write(chunk);
        }
    }

    fn cfb_encrypt(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
            let keystream = self.schedule.encrypt_block(self.chain);
            self.chain = ChainBlock::read(chunk) ^ keystream;
            self.chain.write(chunk);
        }
    }

    fn cfb_decrypt(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
            let keystream = self.schedule.encrypt_block(self.chain);
            let crypt = ChainBlock::read(chunk);
            self.chain = crypt;
            (crypt ^ keystream).write(chunk);
        }
    }
}

fn check_blocks(len: usize) -> CipherResult<()> {
    if len % BLOCK_SIZE != 0 {
        return Err(CipherError::InvalidBufferLength { len });
    }
    Ok(())
}

fn check_pair(src: &[u8], dst: &[u8]) -> CipherResult<()> {
    check_blocks(src.len())?;
    if src.len() != dst.len() {
        return Err(CipherError::LengthMismatch {
            src: src.len(),
            dst: dst.len(),
        });
    }
    Ok(())
}
