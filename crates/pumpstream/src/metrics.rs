/// Counters describing how a [`PumpAdapter`](crate::PumpAdapter) has used its producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpMetrics {
    /// Number of times the producer was invoked.
    pub producer_calls: u64,
    /// Bytes the producer yielded in total.
    pub bytes_produced: u64,
    /// Bytes handed to readers in total.
    pub bytes_delivered: u64,
    /// Bytes produced ahead of demand and still staged.
    pub bytes_staged: u64,
}

impl PumpMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}
