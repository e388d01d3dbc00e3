pub mod builtin;

use std::fmt::Debug;

use blockexec_error::Result;

use crate::arrays::bitmap::Bitmap;
use crate::arrays::block::ValueBlock;
use crate::arrays::scalar::ScalarValue;

/// Running state of an aggregate for a single group.
///
/// `None` indicates no contribution yet; combining `None` with a partial
/// yields the partial unchanged.
pub type AggState = Option<ScalarValue>;

/// An aggregate split into a block-level partial reduction and a row-level
/// combine of partials.
///
/// The row-level combine must be associative and commutative over the
/// partials it receives; the engine gives no guarantee on the order partials
/// arrive in.
pub trait BlockAggregateFunction: Debug + Sync + Send {
    fn name(&self) -> &'static str;

    /// Whether this aggregate consumes one of the chunk's data blocks.
    ///
    /// Aggregates that only look at the selection bitmap (count) return
    /// false and are skipped during data block assignment.
    fn needs_input(&self) -> bool {
        true
    }

    /// Reduce the selected rows of a block to a single partial value.
    ///
    /// The selection is guaranteed to contain at least one 'true' entry.
    fn block_agg(&self, selection: &Bitmap, input: Option<&ValueBlock>) -> Result<ScalarValue>;

    /// Merge a partial value into the running state for a group.
    fn row_agg(&self, state: AggState, partial: ScalarValue) -> Result<ScalarValue>;
}
