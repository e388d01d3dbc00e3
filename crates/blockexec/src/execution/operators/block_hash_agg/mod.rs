pub mod hash_table;
mod partition;

pub use hash_table::{GroupTable, GroupedResults, ResultRow};

use blockexec_error::{BlockexecError, Result};
use tracing::trace;

use self::partition::partition_chunk;
use super::ChunkSource;
use crate::arrays::block::ValueBlock;
use crate::arrays::chunk::{Chunk, GroupKeys};
use crate::functions::aggregate::BlockAggregateFunction;

/// Declared shape of the group key input, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKeyShape {
    /// A single key broadcast to all rows of a chunk.
    Scalar,
    /// One key per row.
    Block,
}

#[derive(Debug)]
enum StageState {
    Uninitialized,
    /// Pulling chunks from the upstream and updating the group table.
    Accumulating { table: GroupTable },
    /// Input exhausted, composite result buffered for the first `get_next`.
    Drained { results: GroupedResults },
    Exhausted,
}

/// Blocking hash aggregation over chunks of block data.
///
/// Consumes the upstream to exhaustion, grouping active rows by key and
/// folding block-level partials through each aggregate's row-level combine.
/// Produces the grouped results as a single composite output, then signals
/// end of data. No output is observable before the entire input is consumed,
/// and no ordering of groups is guaranteed.
#[derive(Debug)]
pub struct BlockHashAggStage {
    child: Box<dyn ChunkSource>,
    /// Aggregates in registration order. The order determines both data block
    /// assignment and output field order.
    aggregates: Vec<Box<dyn BlockAggregateFunction>>,
    key_shape: GroupKeyShape,
    /// Number of data blocks each chunk must carry: one per input-consuming
    /// aggregate.
    num_data_blocks: usize,
    state: StageState,
}

impl BlockHashAggStage {
    pub fn new(
        child: Box<dyn ChunkSource>,
        key_shape: GroupKeyShape,
        aggregates: Vec<Box<dyn BlockAggregateFunction>>,
    ) -> Self {
        let num_data_blocks = aggregates.iter().filter(|agg| agg.needs_input()).count();

        BlockHashAggStage {
            child,
            aggregates,
            key_shape,
            num_data_blocks,
            state: StageState::Uninitialized,
        }
    }

    /// Open the stage, resetting the group table.
    pub fn open(&mut self) -> Result<()> {
        self.child.open()?;
        self.state = StageState::Accumulating {
            table: GroupTable::new(self.aggregates.len()),
        };
        trace!("block hash agg opened");
        Ok(())
    }

    /// Get the next output.
    ///
    /// The first call consumes the entire upstream and returns the composite
    /// grouped result; subsequent calls return `None`. Errors from the
    /// upstream or from aggregate evaluation propagate unchanged and discard
    /// all accumulated state.
    pub fn get_next(&mut self) -> Result<Option<GroupedResults>> {
        if matches!(self.state, StageState::Accumulating { .. }) {
            match self.accumulate_to_exhaustion() {
                Ok(results) => self.state = StageState::Drained { results },
                Err(e) => {
                    // Table was already taken out of the state; nothing to
                    // salvage.
                    self.state = StageState::Exhausted;
                    return Err(e);
                }
            }
        }

        match std::mem::replace(&mut self.state, StageState::Exhausted) {
            StageState::Uninitialized => {
                self.state = StageState::Uninitialized;
                Err(BlockexecError::new("Stage has not been opened"))
            }
            StageState::Drained { results } => Ok(Some(results)),
            StageState::Exhausted => Ok(None),
            StageState::Accumulating { .. } => unreachable!("accumulation handled above"),
        }
    }

    /// Close the stage, releasing the table and any buffered result.
    pub fn close(&mut self) {
        self.state = StageState::Uninitialized;
        self.child.close();
        trace!("block hash agg closed");
    }

    fn accumulate_to_exhaustion(&mut self) -> Result<GroupedResults> {
        let mut table = match std::mem::replace(&mut self.state, StageState::Exhausted) {
            StageState::Accumulating { table } => table,
            other => {
                self.state = other;
                return Err(BlockexecError::new("Stage not accumulating"));
            }
        };

        while let Some(chunk) = self.child.next_chunk()? {
            self.accumulate_chunk(&mut table, &chunk)?;
        }

        trace!(num_groups = table.num_groups(), "input exhausted, draining");
        table.drain()
    }

    fn accumulate_chunk(&self, table: &mut GroupTable, chunk: &Chunk) -> Result<()> {
        match (&self.key_shape, &chunk.keys) {
            (GroupKeyShape::Scalar, GroupKeys::Scalar(_)) => (),
            (GroupKeyShape::Block, GroupKeys::Block(_)) => (),
            (shape, _) => {
                return Err(BlockexecError::new("Chunk key shape does not match stage")
                    .with_field("expected", format!("{shape:?}")))
            }
        }

        if chunk.data.len() != self.num_data_blocks {
            return Err(BlockexecError::new("Unexpected number of data blocks in chunk")
                .with_field("want", self.num_data_blocks)
                .with_field("got", chunk.data.len()));
        }

        // Assign data blocks to input-consuming aggregates in registration
        // order. Shared across all partitions of the chunk.
        let mut data_iter = chunk.data.iter();
        let inputs: Vec<Option<&ValueBlock>> = self
            .aggregates
            .iter()
            .map(|agg| {
                if agg.needs_input() {
                    data_iter.next()
                } else {
                    None
                }
            })
            .collect();

        for (key, mask) in partition_chunk(chunk)? {
            let partials = self
                .aggregates
                .iter()
                .zip(&inputs)
                .map(|(agg, input)| agg.block_agg(&mask, *input))
                .collect::<Result<Vec<_>>>()?;

            table.contribute(key, partials, &self.aggregates)?;
        }

        Ok(())
    }
}
