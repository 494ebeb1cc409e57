//! Integration tests for pumpstream.

use pumpstream::producer::{from_fn_fallible, from_iter, from_reader};
use pumpstream::{
    BoundedBuffer, ByteStream, Bytes, DataProducer, Produced, ProducerError, PumpAdapter,
    PumpConfig, PumpState, StreamError,
};
use std::io::{self, Cursor, Read};

/// Producer yielding `k` bytes per call for `m` calls, then `End`, counting calls.
struct FixedChunks {
    k: usize,
    m: usize,
    calls: usize,
}

impl DataProducer for FixedChunks {
    fn produce(&mut self, _requested: usize) -> Result<Produced, ProducerError> {
        self.calls += 1;
        if self.calls > self.m {
            return Ok(Produced::End);
        }
        Ok(Produced::Chunk(Bytes::from(vec![b'k'; self.k])))
    }
}

#[test]
fn test_partial_pump_satisfaction() {
    let (k, m) = (3, 4);
    let mut stream = PumpAdapter::new(FixedChunks { k, m, calls: 0 });

    let out = stream.read(100).unwrap();
    assert_eq!(out.len(), k * m);
    assert!(stream.eof());
    assert_eq!(stream.tell().unwrap(), (k * m) as u64);

    // m chunks plus the end-signal
    assert_eq!(stream.metrics().producer_calls, (m + 1) as u64);
}

#[test]
fn test_no_producer_calls_after_exhaustion() {
    let mut stream = PumpAdapter::new(FixedChunks { k: 2, m: 1, calls: 0 });
    assert_eq!(stream.get_contents().unwrap().len(), 2);

    for _ in 0..3 {
        assert!(stream.read(16).unwrap().is_empty());
    }
    let producer = stream.detach().map(|p| p.calls);
    // Already exhausted, so there is nothing to hand back
    assert_eq!(producer, None);
    assert_eq!(stream.metrics().producer_calls, 2);
}

#[test]
fn test_detach_hands_back_producer() {
    let mut stream = PumpAdapter::new(FixedChunks { k: 4, m: 10, calls: 0 });
    assert_eq!(stream.read(6).unwrap().len(), 6);

    let producer = stream.detach().expect("producer still active");
    assert_eq!(producer.calls, 2);
    assert!(stream.eof());
    assert!(matches!(stream.tell(), Err(StreamError::Detached)));
    assert!(stream.read(6).unwrap().is_empty());
}

#[test]
fn test_producer_error_propagates_without_loss() {
    let mut step = 0;
    let mut stream = PumpAdapter::new(from_fn_fallible(move |_requested: usize| {
        step += 1;
        match step {
            1 => Ok(Some("abc")),
            2 => Err(io::Error::new(io::ErrorKind::TimedOut, "slow source")),
            3 => Ok(Some("def")),
            _ => Ok(None),
        }
    }));

    let err = stream.read(5).unwrap_err();
    match &err {
        StreamError::Producer(source) => {
            let io_err = source.downcast_ref::<io::Error>().expect("io error passes through");
            assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_terminal());

    // Nothing was consumed by the failed read; a retry picks up where it left off
    assert_eq!(stream.tell().unwrap(), 0);
    assert_eq!(stream.state(), PumpState::Active);
    assert_eq!(stream.read(5).unwrap(), Bytes::from_static(b"abcde"));
    assert_eq!(stream.get_contents().unwrap(), Bytes::from_static(b"f"));
    assert!(stream.eof());
}

#[test]
fn test_iterator_source() {
    let parts = ["GET ", "/ ", "HTTP/1.1"];
    let mut stream = PumpAdapter::new(from_iter(parts));

    assert_eq!(stream.read(2).unwrap(), Bytes::from_static(b"GE"));
    assert_eq!(stream.read(5).unwrap(), Bytes::from_static(b"T / H"));
    assert_eq!(stream.get_contents().unwrap(), Bytes::from_static(b"TTP/1.1"));
    assert_eq!(stream.tell().unwrap(), 14);
}

#[test]
fn test_reader_source_round_trip() {
    let body: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let config = PumpConfig::default().with_size(body.len() as u64);
    let mut stream = PumpAdapter::with_config(from_reader(Cursor::new(body.clone())), config);

    assert_eq!(stream.size(), Some(10_000));
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, body);
    assert!(stream.eof());
}

#[test]
fn test_pump_into_buffer_via_trait_objects() {
    let mut source = PumpAdapter::new(from_iter(["alpha", "beta", "gamma"]));
    let mut sink = BoundedBuffer::with_high_water_mark(8);

    let streams: [&mut dyn ByteStream; 2] = [&mut source, &mut sink];
    assert!(streams.iter().all(|s| !s.is_seekable()));

    while !source.eof() {
        let chunk = ByteStream::read(&mut source, 4).unwrap();
        ByteStream::write(&mut sink, &chunk).unwrap();
    }
    // Advisory limit: the writes went through, the buffer just reports pressure
    assert!(sink.is_above_high_water_mark());
    assert_eq!(sink.get_contents().unwrap(), Bytes::from_static(b"alphabetagamma"));
    assert!(ByteStream::eof(&sink));
}

#[test]
fn test_detached_stream_reports_through_io() {
    let mut stream = PumpAdapter::new(from_iter(["x"]));
    stream.close();
    let err: io::Error = ByteStream::tell(&stream).unwrap_err().into();
    assert_eq!(err.kind(), io::ErrorKind::NotConnected);
}
