use flate2::Compression;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the loose object store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// zlib level, 0 (store) through 9 (best). Values above 9 are clamped.
    pub compression_level: u32,
    /// Skip the write when the object file is already present.
    pub skip_existing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
            skip_existing: true,
        }
    }
}

impl StoreConfig {
    pub fn compression(&self) -> Compression {
        Compression::new(self.compression_level.min(9))
    }
}
