use crate::buffer::BoundedBuffer;
use crate::config::{Metadata, PumpConfig};
use crate::error::{Result, StreamError};
use crate::invariants::{debug_assert_attached, debug_assert_monotonic};
use crate::metrics::PumpMetrics;
use crate::producer::{DataProducer, Produced};
use crate::stream::ByteStream;
use bytes::{Bytes, BytesMut};
use serde_json::Value;
use std::fmt;
use std::io;

/// Chunk size used by [`PumpAdapter::get_contents`].
pub const CONTENTS_CHUNK_SIZE: usize = 1_000_000;

/// Lifecycle of a [`PumpAdapter`].
///
/// `Active → Exhausted` when the producer signals end of data, and either
/// state moves to `Detached` on close. `Detached` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    /// Producer present, position increasing.
    Active,
    /// Producer returned its end-signal. `tell()` still works.
    Exhausted,
    /// Closed or detached. `tell()` fails.
    Detached,
}

/// Read-only stream over a pull-based [`DataProducer`].
///
/// Reads are served from an internal staging buffer first; when it runs short
/// the producer is called, with the outstanding need as the requested length,
/// until the read can be satisfied or the producer signals end of data. Bytes
/// produced beyond the request stay staged for the next read.
///
/// A read returns fewer bytes than asked only at true end of data, so callers
/// check [`eof`](Self::eof) rather than the returned length.
pub struct PumpAdapter<P> {
    /// `None` once exhausted or detached; never called again after that.
    producer: Option<P>,
    /// Bytes delivered to readers; `None` once detached.
    position: Option<u64>,
    staging: BoundedBuffer,
    size: Option<u64>,
    metadata: Metadata,
    metrics: PumpMetrics,
}

impl<P: DataProducer> PumpAdapter<P> {
    /// Wraps `producer` with the default configuration.
    pub fn new(producer: P) -> Self {
        Self::with_config(producer, PumpConfig::default())
    }

    /// Wraps `producer` with the given declared size, metadata and staging
    /// high-water mark.
    pub fn with_config(producer: P, config: PumpConfig) -> Self {
        Self {
            producer: Some(producer),
            position: Some(0),
            staging: BoundedBuffer::with_config(config.buffer_config()),
            size: config.size,
            metadata: config.metadata,
            metrics: PumpMetrics::new(),
        }
    }

    /// Reads up to `len` bytes, pumping the producer as needed.
    ///
    /// If the producer fails, the error is returned as-is and nothing is
    /// consumed: whatever it had already yielded stays staged, and the
    /// position is unchanged.
    pub fn read(&mut self, len: usize) -> Result<Bytes> {
        if self.staging.len() < len {
            self.pump(len)?;
        }
        let chunk = self.staging.read(len);
        self.advance(chunk.len());
        Ok(chunk)
    }

    /// Reads until end of data and returns everything. Destructive.
    pub fn get_contents(&mut self) -> Result<Bytes> {
        let mut contents = BytesMut::new();
        while !self.eof() {
            contents.extend_from_slice(&self.read(CONTENTS_CHUNK_SIZE)?);
        }
        Ok(contents.freeze())
    }

    /// Calls the producer until `len` bytes are staged or it signals end.
    fn pump(&mut self, len: usize) -> Result<()> {
        while self.staging.len() < len {
            let Some(producer) = self.producer.as_mut() else {
                break;
            };
            debug_assert_attached!(self.position.is_some());

            let requested = len - self.staging.len();
            self.metrics.producer_calls += 1;
            match producer.produce(requested).map_err(StreamError::Producer)? {
                Produced::Chunk(chunk) => {
                    tracing::trace!(requested, produced = chunk.len(), "pumped chunk");
                    self.metrics.bytes_produced += chunk.len() as u64;
                    self.staging.write_bytes(chunk);
                }
                Produced::End => {
                    tracing::debug!(
                        produced = self.metrics.bytes_produced,
                        "producer signalled end of data"
                    );
                    self.producer = None;
                }
            }
        }
        Ok(())
    }
}

impl<P> PumpAdapter<P> {
    /// Returns `true` once the producer is gone (exhausted or detached).
    #[inline]
    pub fn eof(&self) -> bool {
        self.producer.is_none()
    }

    /// Returns the number of bytes delivered so far.
    pub fn tell(&self) -> Result<u64> {
        self.position.ok_or(StreamError::Detached)
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> PumpState {
        match (&self.producer, self.position) {
            (_, None) => PumpState::Detached,
            (None, Some(_)) => PumpState::Exhausted,
            (Some(_), Some(_)) => PumpState::Active,
        }
    }

    /// Returns the declared size, if one was configured.
    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Returns the full metadata map.
    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns a single metadata value.
    #[inline]
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Returns a snapshot of the producer usage counters.
    pub fn metrics(&self) -> PumpMetrics {
        PumpMetrics {
            bytes_staged: self.staging.len() as u64,
            ..self.metrics
        }
    }

    /// Detaches the producer and hands it back. Irreversible; staged bytes
    /// are discarded and `tell()` fails from now on.
    pub fn detach(&mut self) -> Option<P> {
        let producer = self.producer.take();
        if self.position.take().is_some() {
            tracing::debug!(
                delivered = self.metrics.bytes_delivered,
                discarded = self.staging.len(),
                "pump adapter detached"
            );
        }
        self.staging.close();
        producer
    }

    /// Detaches and drops the producer. Idempotent.
    pub fn close(&mut self) {
        self.detach();
    }

    fn advance(&mut self, n: usize) {
        if let Some(position) = self.position.as_mut() {
            let old = *position;
            *position += n as u64;
            debug_assert_monotonic!(old, *position);
        }
        self.metrics.bytes_delivered += n as u64;
    }
}

impl<P> fmt::Debug for PumpAdapter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PumpAdapter")
            .field("state", &self.state())
            .field("position", &self.position)
            .field("staged", &self.staging.len())
            .field("size", &self.size)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl<P: DataProducer> ByteStream for PumpAdapter<P> {
    fn kind(&self) -> &'static str {
        "PumpAdapter"
    }

    fn read(&mut self, max_len: usize) -> Result<Bytes> {
        PumpAdapter::read(self, max_len)
    }

    fn eof(&self) -> bool {
        PumpAdapter::eof(self)
    }

    fn tell(&self) -> Result<u64> {
        PumpAdapter::tell(self)
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn get_contents(&mut self) -> Result<Bytes> {
        PumpAdapter::get_contents(self)
    }

    fn close(&mut self) {
        PumpAdapter::close(self);
    }

    fn detach(&mut self) {
        PumpAdapter::detach(self);
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn metadata_value(&self, key: &str) -> Option<Value> {
        self.metadata.get(key).cloned()
    }
}

impl<P: DataProducer> io::Read for PumpAdapter<P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = PumpAdapter::read(self, buf.len())?;
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}
