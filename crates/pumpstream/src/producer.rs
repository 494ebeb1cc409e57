//! Data producers: on-demand sources of byte chunks for a [`PumpAdapter`](crate::PumpAdapter).

use crate::error::ProducerError;
use bytes::Bytes;
use std::io::{self, Read};

/// Outcome of a single producer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Produced {
    /// A chunk of data. May be shorter or longer than requested.
    Chunk(Bytes),
    /// No more data will ever be produced.
    End,
}

impl<C: Into<Bytes>> From<Option<C>> for Produced {
    fn from(chunk: Option<C>) -> Self {
        chunk.map_or(Self::End, |c| Self::Chunk(c.into()))
    }
}

/// A pull-based source of bytes.
///
/// `requested` is the number of bytes the caller still needs; it is a hint,
/// and implementations may return any amount. Returning [`Produced::End`]
/// retires the producer for good. Errors are passed to the reader unchanged.
///
/// Infallible closures `FnMut(usize) -> Option<C>` implement this trait
/// directly, with `None` as the end-signal.
pub trait DataProducer {
    fn produce(&mut self, requested: usize) -> Result<Produced, ProducerError>;
}

impl<F, C> DataProducer for F
where
    F: FnMut(usize) -> Option<C>,
    C: Into<Bytes>,
{
    fn produce(&mut self, requested: usize) -> Result<Produced, ProducerError> {
        Ok(self(requested).into())
    }
}

// -------------------------------------------------------------------------
// Fallible closures
// -------------------------------------------------------------------------

/// Producer over a closure that may fail. See [`from_fn_fallible`].
#[derive(Debug, Clone)]
pub struct FallibleFn<F> {
    f: F,
}

/// Wraps a closure returning `Result<Option<C>, E>`; `Ok(None)` is the end-signal.
pub fn from_fn_fallible<F, C, E>(f: F) -> FallibleFn<F>
where
    F: FnMut(usize) -> Result<Option<C>, E>,
    C: Into<Bytes>,
    E: Into<ProducerError>,
{
    FallibleFn { f }
}

impl<F, C, E> DataProducer for FallibleFn<F>
where
    F: FnMut(usize) -> Result<Option<C>, E>,
    C: Into<Bytes>,
    E: Into<ProducerError>,
{
    fn produce(&mut self, requested: usize) -> Result<Produced, ProducerError> {
        (self.f)(requested).map(Produced::from).map_err(Into::into)
    }
}

// -------------------------------------------------------------------------
// Iterators
// -------------------------------------------------------------------------

/// Producer yielding one iterator item per call. See [`from_iter`].
#[derive(Debug, Clone)]
pub struct IterProducer<I> {
    iter: I,
}

/// Turns an iterator of chunks into a producer. The requested length is
/// ignored; each item becomes one chunk and exhaustion is the end-signal.
pub fn from_iter<I>(iter: I) -> IterProducer<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Into<Bytes>,
{
    IterProducer {
        iter: iter.into_iter(),
    }
}

impl<I> DataProducer for IterProducer<I>
where
    I: Iterator,
    I::Item: Into<Bytes>,
{
    fn produce(&mut self, _requested: usize) -> Result<Produced, ProducerError> {
        Ok(self.iter.next().into())
    }
}

// -------------------------------------------------------------------------
// Readers
// -------------------------------------------------------------------------

/// Producer pulling from a [`std::io::Read`]. See [`from_reader`].
#[derive(Debug)]
pub struct ReaderProducer<R> {
    reader: R,
}

/// Upper bound on a single read by a [`ReaderProducer`].
pub const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Turns a reader into a producer. Each call reads at most `requested`
/// bytes, capped at [`READ_CHUNK_SIZE`]; a zero-length read is the end-signal.
pub fn from_reader<R: Read>(reader: R) -> ReaderProducer<R> {
    ReaderProducer { reader }
}

impl<R> ReaderProducer<R> {
    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> DataProducer for ReaderProducer<R> {
    fn produce(&mut self, requested: usize) -> Result<Produced, ProducerError> {
        if requested == 0 {
            return Ok(Produced::Chunk(Bytes::new()));
        }
        let mut chunk = vec![0u8; requested.min(READ_CHUNK_SIZE)];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => return Ok(Produced::End),
                Ok(n) => {
                    chunk.truncate(n);
                    return Ok(Produced::Chunk(chunk.into()));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}
