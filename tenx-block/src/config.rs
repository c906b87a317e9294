use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default size of a dense block, in bytes
pub const DEFAULT_BLOCK_SIZE: usize = 100_000_000;

/// Settings for block-wise processing, passed explicitly to every block operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Worker threads used to process blocks. 0 lets rayon decide.
    pub workers: usize,
    /// Upper bound on the bytes of one dense block
    pub block_size: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        BlockConfig {
            workers: rayon::current_num_threads(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl BlockConfig {
    pub fn new(workers: usize, block_size: usize) -> BlockConfig {
        BlockConfig { workers, block_size }
    }

    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<BlockConfig, Error> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path).with_context(|| path.display().to_string())?);
        let config = serde_json::from_reader(reader).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Worker pool sized for this configuration
    pub fn thread_pool(&self) -> Result<rayon::ThreadPool, Error> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        Ok(pool)
    }
}
