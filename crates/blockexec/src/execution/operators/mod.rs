pub mod block_hash_agg;
pub mod values;

use std::fmt::Debug;

use blockexec_error::Result;

use crate::arrays::chunk::Chunk;

/// A pull-based producer of chunks.
///
/// Synchronous: `next_chunk` blocks until the next chunk is available or the
/// input is exhausted. Any error propagates unchanged to the caller.
pub trait ChunkSource: Debug {
    fn open(&mut self) -> Result<()>;

    /// Pull the next chunk, or `None` on end of data.
    fn next_chunk(&mut self) -> Result<Option<Chunk>>;

    fn close(&mut self);
}
