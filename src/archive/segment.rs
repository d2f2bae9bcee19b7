use crate::error::PackError;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Read-only window over `[start, start + count)` of a seekable store
///
/// The view has its own zero-based position, derived from the inner store's
/// position. Every read moves the inner store, so two views over one store
/// must not be interleaved.
pub struct RangeView<S> {
    inner: S,
    start: u64,
    count: u64,
}

impl<S: Read + Seek> RangeView<S> {
    /// Create a view and move the inner store to `start`
    pub fn new(mut inner: S, start: u64, count: u64) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(start))?;
        Ok(Self {
            inner,
            start,
            count,
        })
    }

    /// Current position within the view
    pub fn position(&mut self) -> io::Result<u64> {
        let absolute = self.inner.stream_position()?;
        Ok(absolute.saturating_sub(self.start))
    }
}

impl<S> RangeView<S> {
    /// Length of the view in bytes
    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Read + Seek> Read for RangeView<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let position = self.position()?;
        if position >= self.count {
            return Ok(0);
        }

        let remaining = self.count - position;
        let to_read = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        self.inner.read(&mut buf[..to_read])
    }
}

impl<S: Read + Seek> Seek for RangeView<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(delta) => i128::from(self.position()?) + i128::from(delta),
            // Offsets count backward from the end
            SeekFrom::End(offset) => i128::from(self.count) - i128::from(offset),
        };

        if target < 0 || target > i128::from(self.count) {
            return Err(PackError::OutOfRange {
                position: i64::try_from(target).unwrap_or(i64::MAX),
                len: self.count,
            }
            .into());
        }

        let target = target as u64;
        self.inner.seek(SeekFrom::Start(self.start + target))?;
        Ok(target)
    }
}

impl<S> Write for RangeView<S> {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(PackError::Unsupported("writing through a range view").into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
