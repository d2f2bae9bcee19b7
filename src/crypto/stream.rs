use crate::crypto::mt::MersenneTwister;
use crate::error::PackError;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Constant mixed into every entry seed before it reaches the generator
pub const SEED_XOR_KEY: u32 = 0xA9C36DE1;

/// Map an entry's stored seed to the generator seed
pub fn derive_seed(seed: i32) -> u32 {
    ((seed as u32) << 7) ^ SEED_XOR_KEY
}

/// XOR stream cipher over an inner reader or writer
///
/// Byte `n` of the logical stream is XORed with the low byte of the `n`-th
/// keystream word, so the transform is its own inverse. The keystream is tied
/// to the number of bytes processed, which is why the stream cannot seek.
pub struct CryptoStream<S> {
    inner: S,
    twister: MersenneTwister,
}

impl<S> CryptoStream<S> {
    /// Wrap `inner`, keying the keystream from an entry seed
    pub fn new(inner: S, seed: i32) -> Self {
        Self {
            inner,
            twister: MersenneTwister::with_seed(derive_seed(seed)),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn apply(&mut self, buf: &mut [u8]) {
        for byte in buf {
            *byte ^= self.twister.next_u32() as u8;
        }
    }
}

impl<R: Read> Read for CryptoStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.apply(&mut buf[..read]);
        Ok(read)
    }
}

impl<W: Write> Write for CryptoStream<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut scrambled = buf.to_vec();
        self.apply(&mut scrambled);
        // The keystream already advanced over the whole buffer
        self.inner.write_all(&scrambled)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<S> Seek for CryptoStream<S> {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(PackError::Unsupported("seeking a cipher stream").into())
    }
}
