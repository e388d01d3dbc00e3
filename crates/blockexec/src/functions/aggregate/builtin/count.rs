use blockexec_error::Result;

use super::sum::checked_add;
use crate::arrays::bitmap::Bitmap;
use crate::arrays::block::ValueBlock;
use crate::arrays::scalar::ScalarValue;
use crate::functions::aggregate::{AggState, BlockAggregateFunction};

/// Counts selected rows. Consumes no data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count;

impl BlockAggregateFunction for Count {
    fn name(&self) -> &'static str {
        "count"
    }

    fn needs_input(&self) -> bool {
        false
    }

    fn block_agg(&self, selection: &Bitmap, _input: Option<&ValueBlock>) -> Result<ScalarValue> {
        Ok(ScalarValue::Int64(selection.count_trues() as i64))
    }

    fn row_agg(&self, state: AggState, partial: ScalarValue) -> Result<ScalarValue> {
        match state {
            None => Ok(partial),
            Some(curr) => checked_add(curr, partial),
        }
    }
}
