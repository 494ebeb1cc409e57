use crate::config::{BufferConfig, Metadata};
use crate::error::{Result, StreamError};
use crate::invariants::{debug_assert_conserved, debug_assert_short_read_drains};
use crate::stream::ByteStream;
use bytes::{Bytes, BytesMut};
use serde_json::Value;
use std::collections::VecDeque;
use std::io;

/// Metadata key under which the high-water mark is exposed.
pub const HWM_KEY: &str = "hwm";

/// FIFO byte queue with an advisory high-water mark.
///
/// Bytes are appended at the tail by [`write`](Self::write) and taken from the
/// head by [`read`](Self::read); nothing in between is ever mutated. The
/// high-water mark does not bound the queue. `write` always succeeds and
/// pressure is reported by [`is_above_high_water_mark`](Self::is_above_high_water_mark);
/// callers that want the limit enforced use [`try_write`](Self::try_write).
///
/// Contents are held as a queue of shared [`Bytes`] chunks, so chunks appended
/// with [`write_bytes`](Self::write_bytes) and reads that fall within one chunk
/// are served without copying.
#[derive(Debug, Default)]
pub struct BoundedBuffer {
    chunks: VecDeque<Bytes>,
    len: usize,
    config: BufferConfig,
}

impl BoundedBuffer {
    /// Creates an empty buffer with the default high-water mark.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with the given configuration.
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            chunks: VecDeque::new(),
            len: 0,
            config,
        }
    }

    /// Creates an empty buffer with the given high-water mark.
    pub fn with_high_water_mark(high_water_mark: usize) -> Self {
        Self::with_config(BufferConfig::new(high_water_mark))
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the advisory high-water mark.
    #[inline]
    pub fn high_water_mark(&self) -> usize {
        self.config.high_water_mark
    }

    /// Returns the number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the buffer has reached its high-water mark and
    /// writers should slow down.
    #[inline]
    pub fn is_above_high_water_mark(&self) -> bool {
        self.len() >= self.high_water_mark()
    }

    /// Bytes that can still be written before the high-water mark is reached.
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.high_water_mark().saturating_sub(self.len())
    }

    // ---------------------------------------------------------------------
    // WRITE
    // ---------------------------------------------------------------------

    /// Appends a copy of `data` and returns its length. Never fails.
    pub fn write(&mut self, data: &[u8]) -> usize {
        self.write_bytes(Bytes::copy_from_slice(data))
    }

    /// Appends `chunk` without copying and returns its length. Never fails.
    pub fn write_bytes(&mut self, chunk: Bytes) -> usize {
        let n = chunk.len();
        if n == 0 {
            return 0;
        }
        let was_above = self.is_above_high_water_mark();
        self.len += n;
        self.chunks.push_back(chunk);
        if !was_above && self.is_above_high_water_mark() {
            tracing::debug!(
                buffered = self.len(),
                high_water_mark = self.high_water_mark(),
                "buffer crossed its high-water mark"
            );
        }
        n
    }

    /// Appends `data` only if the resulting size stays below the high-water
    /// mark; otherwise nothing is written.
    pub fn try_write(&mut self, data: &[u8]) -> Result<usize> {
        if self.len() + data.len() >= self.high_water_mark() {
            return Err(StreamError::CapacityExceeded {
                requested: data.len(),
                buffered: self.len(),
                high_water_mark: self.high_water_mark(),
            });
        }
        Ok(self.write(data))
    }

    // ---------------------------------------------------------------------
    // READ
    // ---------------------------------------------------------------------

    /// Removes and returns up to `n` bytes from the head.
    ///
    /// Returns everything if `n` covers the whole buffer, otherwise exactly
    /// `n` bytes with the remainder left in order.
    pub fn read(&mut self, n: usize) -> Bytes {
        let before = self.len();
        let chunk = if n >= before {
            self.take_all()
        } else {
            self.take(n)
        };
        debug_assert_conserved!(before, chunk.len(), self.len());
        debug_assert_short_read_drains!(n, chunk.len(), self.len());
        chunk
    }

    /// Removes and returns the whole buffer.
    pub fn drain_all(&mut self) -> Bytes {
        let before = self.len();
        let chunk = self.take_all();
        debug_assert_conserved!(before, chunk.len(), self.len());
        chunk
    }

    /// Discards the buffered bytes. Idempotent.
    pub fn close(&mut self) {
        self.chunks.clear();
        self.len = 0;
    }

    /// Same as [`close`](Self::close): a buffer has no underlying resource
    /// to hand back.
    pub fn detach(&mut self) {
        self.close();
    }

    /// Takes exactly `n < len` bytes from the head.
    fn take(&mut self, n: usize) -> Bytes {
        self.len -= n;
        let front_len = self.chunks.front().map_or(0, Bytes::len);
        if front_len == n {
            return self.chunks.pop_front().unwrap_or_default();
        }
        if front_len > n {
            if let Some(front) = self.chunks.front_mut() {
                return front.split_to(n);
            }
        }

        let mut out = BytesMut::with_capacity(n);
        while out.len() < n {
            let Some(front) = self.chunks.front_mut() else {
                break;
            };
            let want = n - out.len();
            if front.len() > want {
                out.extend_from_slice(&front.split_to(want));
            } else {
                out.extend_from_slice(&front[..]);
                self.chunks.pop_front();
            }
        }
        out.freeze()
    }

    /// Takes the whole contents, joining chunks only when there is more than one.
    fn take_all(&mut self) -> Bytes {
        self.len = 0;
        match self.chunks.len() {
            0 => Bytes::new(),
            1 => self.chunks.pop_front().unwrap_or_default(),
            _ => {
                let mut out = BytesMut::with_capacity(self.chunks.iter().map(Bytes::len).sum());
                for chunk in self.chunks.drain(..) {
                    out.extend_from_slice(&chunk);
                }
                out.freeze()
            }
        }
    }
}

impl ByteStream for BoundedBuffer {
    fn kind(&self) -> &'static str {
        "BoundedBuffer"
    }

    fn read(&mut self, max_len: usize) -> Result<Bytes> {
        Ok(BoundedBuffer::read(self, max_len))
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(BoundedBuffer::write(self, data))
    }

    fn eof(&self) -> bool {
        self.is_empty()
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn size(&self) -> Option<u64> {
        Some(self.len() as u64)
    }

    fn get_contents(&mut self) -> Result<Bytes> {
        Ok(self.drain_all())
    }

    fn close(&mut self) {
        BoundedBuffer::close(self);
    }

    fn detach(&mut self) {
        BoundedBuffer::detach(self);
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(HWM_KEY.to_owned(), Value::from(self.high_water_mark()));
        metadata
    }

    fn metadata_value(&self, key: &str) -> Option<Value> {
        (key == HWM_KEY).then(|| Value::from(self.high_water_mark()))
    }
}

impl io::Read for BoundedBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = BoundedBuffer::read(self, buf.len());
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl io::Write for BoundedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(BoundedBuffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
