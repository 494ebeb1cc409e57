//! Configuration for buffers and pump adapters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque key/value metadata attached to a stream.
pub type Metadata = serde_json::Map<String, Value>;

/// Default advisory high-water mark, in bytes.
pub const DEFAULT_HIGH_WATER_MARK: usize = 16384;

/// Configuration for a [`BoundedBuffer`](crate::BoundedBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Preferred maximum number of buffered bytes.
    ///
    /// Advisory only: writes past it still succeed, but the buffer reports
    /// pressure and `try_write` refuses.
    ///
    /// Default: 16384
    pub high_water_mark: usize,
}

impl BufferConfig {
    /// Creates a configuration with the given high-water mark.
    pub const fn new(high_water_mark: usize) -> Self {
        Self { high_water_mark }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_WATER_MARK)
    }
}

/// Configuration for a [`PumpAdapter`](crate::PumpAdapter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpConfig {
    /// Declared total length of the stream. Informational, never checked
    /// against what the producer actually yields.
    ///
    /// Default: unknown
    pub size: Option<u64>,

    /// Caller-supplied metadata, returned verbatim by metadata queries.
    ///
    /// Default: empty
    pub metadata: Metadata,

    /// High-water mark of the internal staging buffer.
    ///
    /// Default: 16384
    pub high_water_mark: usize,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            size: None,
            metadata: Metadata::new(),
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
        }
    }
}

impl PumpConfig {
    /// Sets the declared size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Replaces the whole metadata map.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds a single metadata entry.
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sets the staging buffer's high-water mark.
    pub fn with_high_water_mark(mut self, high_water_mark: usize) -> Self {
        self.high_water_mark = high_water_mark;
        self
    }

    pub(crate) fn buffer_config(&self) -> BufferConfig {
        BufferConfig::new(self.high_water_mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        assert_eq!(BufferConfig::default().high_water_mark, 16384);

        let config = PumpConfig::default();
        assert_eq!(config.size, None);
        assert!(config.metadata.is_empty());
        assert_eq!(config.high_water_mark, DEFAULT_HIGH_WATER_MARK);
    }

    #[test]
    fn test_builder() {
        let config = PumpConfig::default()
            .with_size(42)
            .with_metadata_entry("uri", "memory://body")
            .with_high_water_mark(64);

        assert_eq!(config.size, Some(42));
        assert_eq!(config.metadata["uri"], json!("memory://body"));
        assert_eq!(config.buffer_config(), BufferConfig::new(64));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PumpConfig =
            serde_json::from_value(json!({ "size": 7, "metadata": { "a": [1, 2] } })).unwrap();
        assert_eq!(config.size, Some(7));
        assert_eq!(config.metadata["a"], json!([1, 2]));
        assert_eq!(config.high_water_mark, DEFAULT_HIGH_WATER_MARK);

        let config: BufferConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BufferConfig::default());
    }
}
