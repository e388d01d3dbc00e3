use std::hash::{Hash, Hasher};

use ahash::RandomState;
use blockexec_error::{BlockexecError, Result};
use hashbrown::HashMap;

use crate::arrays::block::ValueBlock;
use crate::arrays::scalar::ScalarValue;
use crate::functions::aggregate::{AggState, BlockAggregateFunction};

/// Group key wrapper providing equality and hashing over the canonical form
/// of a scalar value.
#[derive(Debug, Clone)]
pub struct GroupKey(pub ScalarValue);

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.normalized() == other.0.normalized()
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.normalized().hash(state)
    }
}

/// Table mapping group keys to per-aggregate running states.
///
/// Entries are created lazily on first contribution, never evicted, and the
/// table is unbounded: memory grows with the number of distinct keys
/// observed.
#[derive(Debug)]
pub struct GroupTable {
    entries: HashMap<GroupKey, Vec<AggState>, RandomState>,
    num_aggs: usize,
}

impl GroupTable {
    pub fn new(num_aggs: usize) -> Self {
        GroupTable {
            entries: HashMap::default(),
            num_aggs,
        }
    }

    pub fn num_groups(&self) -> usize {
        self.entries.len()
    }

    /// Merge one partial per aggregate into the states for a key.
    ///
    /// Creates an all-absent entry on the first contribution for a key. May
    /// be called any number of times per key, across any number of chunks, in
    /// any order.
    pub fn contribute(
        &mut self,
        key: ScalarValue,
        partials: Vec<ScalarValue>,
        aggs: &[Box<dyn BlockAggregateFunction>],
    ) -> Result<()> {
        debug_assert_eq!(self.num_aggs, partials.len());
        debug_assert_eq!(self.num_aggs, aggs.len());

        let states = self
            .entries
            .entry(GroupKey(key))
            .or_insert_with(|| vec![None; self.num_aggs]);

        for ((state, partial), agg) in states.iter_mut().zip(partials).zip(aggs) {
            let curr = state.take();
            *state = Some(agg.row_agg(curr, partial)?);
        }

        Ok(())
    }

    /// Consume the table, materializing one output row per group.
    ///
    /// Each row is the group key followed by one field per aggregate, every
    /// field wrapped as a length-1 block. Row order is unspecified.
    pub fn drain(self) -> Result<GroupedResults> {
        let num_aggs = self.num_aggs;
        let mut rows = Vec::with_capacity(self.entries.len());

        for (key, states) in self.entries {
            let mut fields = Vec::with_capacity(1 + num_aggs);
            fields.push(ValueBlock::singleton(key.0));

            for state in states {
                // Every existing group got at least one partial per aggregate.
                let value = state.ok_or_else(|| {
                    BlockexecError::new("Aggregate state absent for existing group")
                })?;
                fields.push(ValueBlock::singleton(value));
            }

            rows.push(ResultRow { fields });
        }

        Ok(GroupedResults { rows })
    }
}

/// A single output record: the group key followed by the aggregate results,
/// each a length-1 block.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub fields: Vec<ValueBlock>,
}

/// The composite result of an aggregation: all group rows, delivered to the
/// consumer as a single output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedResults {
    pub rows: Vec<ResultRow>,
}
