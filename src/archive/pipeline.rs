use crate::archive::segment::RangeView;
use crate::crypto::CryptoStream;
use flate2::read::ZlibDecoder;
use std::io::{self, Read, Seek};

/// Decode pipeline for one entry
///
/// Each variant is one stage deeper: the raw range, the range run through the
/// cipher, and the decrypted range run through zlib. The stream borrows the
/// reader's store for its whole life.
pub enum EntryStream<'a, R> {
    Raw(RangeView<&'a mut R>),
    Decrypted(CryptoStream<RangeView<&'a mut R>>),
    Inflated(ZlibDecoder<CryptoStream<RangeView<&'a mut R>>>),
}

impl<'a, R: Read + Seek> EntryStream<'a, R> {
    /// Wrap a range view with the cipher and, if `compressed`, zlib
    pub fn decode(view: RangeView<&'a mut R>, seed: i32, compressed: bool) -> Self {
        let decrypted = CryptoStream::new(view, seed);
        if compressed {
            EntryStream::Inflated(ZlibDecoder::new(decrypted))
        } else {
            EntryStream::Decrypted(decrypted)
        }
    }

    /// Length of the stored (encrypted) range
    pub fn len(&self) -> u64 {
        match self {
            EntryStream::Raw(view) => view.len(),
            EntryStream::Decrypted(stream) => stream.get_ref().len(),
            EntryStream::Inflated(decoder) => decoder.get_ref().get_ref().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Read + Seek> Read for EntryStream<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            EntryStream::Raw(view) => view.read(buf),
            EntryStream::Decrypted(stream) => stream.read(buf),
            EntryStream::Inflated(decoder) => decoder.read(buf),
        }
    }
}
