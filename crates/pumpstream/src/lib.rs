//! PumpStream - In-Memory Byte Streams
//!
//! Two streams that satisfy a common read/write/eof/tell/metadata contract
//! ([`ByteStream`]) without a file descriptor or socket behind them:
//!
//! - [`BoundedBuffer`]: a FIFO byte queue you write into and read out of, with
//!   an advisory high-water mark for backpressure signalling.
//! - [`PumpAdapter`]: a read-only stream over a pull-based [`DataProducer`],
//!   staging over-produced bytes in its own `BoundedBuffer`.
//!
//! Everything is synchronous and single-threaded. Neither stream is seekable.
//!
//! # Example
//!
//! ```
//! use pumpstream::{BoundedBuffer, PumpAdapter};
//!
//! let mut buffer = BoundedBuffer::with_high_water_mark(10);
//! buffer.write(b"hello");
//! assert_eq!(&buffer.read(3)[..], b"hel");
//!
//! // Any FnMut(usize) -> Option<chunk> is a producer; None ends the stream.
//! let mut chunks = vec!["CDE", "AB"];
//! let mut stream = PumpAdapter::new(move |_requested: usize| chunks.pop());
//!
//! assert_eq!(&stream.read(4).unwrap()[..], b"ABCD");
//! assert_eq!(stream.tell().unwrap(), 4);
//! assert!(!stream.eof());
//!
//! assert_eq!(&stream.read(10).unwrap()[..], b"E");
//! assert!(stream.eof());
//! ```

mod buffer;
mod config;
mod error;
mod invariants;
mod metrics;
pub mod producer;
mod pump;
mod stream;

pub use buffer::{BoundedBuffer, HWM_KEY};
pub use config::{BufferConfig, Metadata, PumpConfig, DEFAULT_HIGH_WATER_MARK};
pub use error::{ProducerError, Result, StreamError};
pub use metrics::PumpMetrics;
pub use producer::{DataProducer, Produced};
pub use pump::{PumpAdapter, PumpState, CONTENTS_CHUNK_SIZE};
pub use stream::ByteStream;

// Re-export the chunk type used throughout the API
pub use bytes::Bytes;
