//! Property-based tests for buffer ordering/conservation and pump accounting.

use proptest::prelude::*;
use pumpstream::producer::from_iter;
use pumpstream::{BoundedBuffer, PumpAdapter};

fn chunks() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..32)
}

// =============================================================================
// FIFO ordering
// "bytes come back in the order written, whatever the read sizes"
// =============================================================================

proptest! {
    #[test]
    fn prop_fifo_ordering(
        writes in chunks(),
        read_sizes in prop::collection::vec(1usize..50, 1..64),
    ) {
        let mut buf = BoundedBuffer::new();
        let expected: Vec<u8> = writes.concat();
        for w in &writes {
            buf.write(w);
        }

        let mut out = Vec::new();
        for n in read_sizes.iter().cycle() {
            if buf.is_empty() {
                break;
            }
            out.extend_from_slice(&buf.read(*n));
        }

        prop_assert_eq!(out, expected);
    }
}

// =============================================================================
// Conservation
// "len() == written - read, for any interleaving"
// =============================================================================

proptest! {
    #[test]
    fn prop_conservation(
        ops in prop::collection::vec((any::<bool>(), 0usize..40), 1..100),
    ) {
        let mut buf = BoundedBuffer::with_high_water_mark(16);
        let mut written = 0usize;
        let mut read = 0usize;

        for (is_write, n) in ops {
            if is_write {
                written += buf.write(&vec![0xAB; n]);
            } else if n % 7 == 0 {
                read += buf.drain_all().len();
            } else {
                let before = buf.len();
                let chunk = buf.read(n);
                prop_assert_eq!(chunk.len(), n.min(before));
                read += chunk.len();
            }
            prop_assert_eq!(buf.len(), written - read);
            prop_assert_eq!(buf.is_above_high_water_mark(), buf.len() >= 16);
        }
    }
}

// =============================================================================
// Pump accounting
// "a pump read is short only at end of data, and tell() counts delivered bytes"
// =============================================================================

proptest! {
    #[test]
    fn prop_pump_delivers_everything_in_order(
        produced in chunks(),
        read_sizes in prop::collection::vec(1usize..100, 1..64),
    ) {
        let expected: Vec<u8> = produced.concat();
        let mut stream = PumpAdapter::new(from_iter(produced));
        let mut out = Vec::new();

        for n in read_sizes.iter().cycle() {
            if stream.eof() {
                break;
            }
            let chunk = stream.read(*n).unwrap();
            prop_assert!(chunk.len() == *n || stream.eof(),
                "short read of {} (requested {}) before end of data", chunk.len(), n);
            out.extend_from_slice(&chunk);
            prop_assert_eq!(stream.tell().unwrap(), out.len() as u64);
        }

        prop_assert_eq!(out, expected);
        prop_assert!(stream.get_contents().unwrap().is_empty());
    }
}
