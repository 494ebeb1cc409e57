//! The stream capability contract shared by every stream in this crate.

use crate::config::Metadata;
use crate::error::{Result, StreamError};
use bytes::Bytes;
use serde_json::Value;
use std::io::SeekFrom;

/// A readable and/or writable byte stream with no underlying descriptor.
///
/// Reads may return fewer bytes than requested; only [`eof`](Self::eof) tells
/// whether more data can follow. None of the streams here are seekable, so the
/// positioning operations default to [`StreamError::Unsupported`].
pub trait ByteStream {
    /// Short name used in error messages.
    fn kind(&self) -> &'static str;

    /// Reads up to `max_len` bytes.
    fn read(&mut self, max_len: usize) -> Result<Bytes>;

    /// Writes `data`, returning the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let _ = data;
        Err(StreamError::unsupported("write", self.kind()))
    }

    /// Returns `true` once no more data can be read.
    fn eof(&self) -> bool;

    /// Returns the number of bytes delivered so far.
    fn tell(&self) -> Result<u64> {
        Err(StreamError::unsupported("tell", self.kind()))
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let _ = pos;
        Err(StreamError::unsupported("seek", self.kind()))
    }

    fn rewind(&mut self) -> Result<()> {
        self.seek(SeekFrom::Start(0)).map(drop)
    }

    fn is_readable(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        false
    }

    /// Total size if known.
    fn size(&self) -> Option<u64>;

    /// Reads everything that remains. Destructive.
    fn get_contents(&mut self) -> Result<Bytes>;

    /// Releases the stream's data. Idempotent.
    fn close(&mut self);

    /// Separates the stream from whatever backs it; the stream is unusable
    /// afterwards. Idempotent.
    fn detach(&mut self) {
        self.close();
    }

    /// Returns the full metadata map.
    fn metadata(&self) -> Metadata;

    /// Returns a single metadata value, or `None` if the key is unknown.
    fn metadata_value(&self, key: &str) -> Option<Value> {
        self.metadata().remove(key)
    }
}
