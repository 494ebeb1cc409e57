//! Demonstration of pumpstream features.
//!
//! Run with: `RUST_LOG=pumpstream=trace cargo run -p pumpstream --features demo --bin demo`

use anyhow::Context;
use pumpstream::producer::{from_fn_fallible, from_reader};
use pumpstream::{BoundedBuffer, ByteStream, PumpAdapter, PumpConfig};
use std::io::{self, Cursor};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== pumpstream Demo ===\n");

    demo_buffer_backpressure()?;
    demo_pumped_producer()?;
    demo_reader_source()?;
    demo_producer_failure();

    println!("\n=== All demos completed successfully! ===");
    Ok(())
}

/// Demo 1: advisory high-water mark on a push buffer
fn demo_buffer_backpressure() -> anyhow::Result<()> {
    println!("--- Demo 1: Buffer Backpressure ---");

    let mut buffer = BoundedBuffer::with_high_water_mark(10);
    buffer.write(b"hello");
    println!("  buffered {} bytes, {} to go before the mark", buffer.len(), buffer.remaining_capacity());

    match buffer.try_write(b"world!") {
        Ok(n) => println!("  strict write accepted {n} bytes"),
        Err(e) => println!("  strict write refused: {e}"),
    }

    buffer.write(b"world!");
    println!("  advisory write accepted; above mark: {}", buffer.is_above_high_water_mark());
    println!("  metadata: {}", serde_json::Value::Object(buffer.metadata()));

    let contents = buffer.get_contents()?;
    println!("  drained {:?}\n", String::from_utf8_lossy(&contents));
    Ok(())
}

/// Demo 2: pumping a closure, with over-production staged between reads
fn demo_pumped_producer() -> anyhow::Result<()> {
    println!("--- Demo 2: Pumped Producer ---");

    let mut counter = 0u32;
    let config = PumpConfig::default()
        .with_metadata_entry("source", "counter")
        .with_size(30);
    let mut stream = PumpAdapter::with_config(
        move |requested: usize| {
            counter += 1;
            (counter <= 5).then(|| format!("chunk-{counter};").repeat(requested.min(2)))
        },
        config,
    );

    while !stream.eof() {
        let chunk = stream.read(7)?;
        println!(
            "  read {:>2} bytes -> {:<10} position={} staged={}",
            chunk.len(),
            String::from_utf8_lossy(&chunk),
            stream.tell()?,
            stream.metrics().bytes_staged
        );
    }
    println!("  state={:?} metrics={:?}", stream.state(), stream.metrics());
    println!("  declared size={:?} metadata={:?}\n", stream.size(), stream.metadata());
    Ok(())
}

/// Demo 3: any std::io::Read as a producer
fn demo_reader_source() -> anyhow::Result<()> {
    println!("--- Demo 3: Reader Source ---");

    let mut stream = PumpAdapter::new(from_reader(Cursor::new("a body that arrives lazily")));
    let head = stream.read(6)?;
    let rest = stream.get_contents().context("draining reader-backed stream")?;
    println!(
        "  head={:?} rest={:?} eof={}",
        String::from_utf8_lossy(&head),
        String::from_utf8_lossy(&rest),
        stream.eof()
    );

    stream.close();
    println!("  after close: tell() -> {}\n", stream.tell().unwrap_err());
    Ok(())
}

/// Demo 4: producer failures reach the reader untouched
fn demo_producer_failure() {
    println!("--- Demo 4: Producer Failure ---");

    let mut stream = PumpAdapter::new(from_fn_fallible(|_requested: usize| {
        Err::<Option<Vec<u8>>, _>(io::Error::new(io::ErrorKind::ConnectionReset, "upstream hung up"))
    }));

    match stream.read(16) {
        Ok(chunk) => println!("  unexpected data: {chunk:?}"),
        Err(e) => println!("  read failed: {e} (recoverable={}, terminal={})", e.is_recoverable(), e.is_terminal()),
    }
}
