pub mod count;
pub mod min_max;
pub mod sum;

use blockexec_error::{BlockexecError, Result};

use crate::arrays::bitmap::Bitmap;
use crate::arrays::block::ValueBlock;

/// Get the required data block for an input-consuming aggregate, checking
/// that it matches the selection length.
pub(crate) fn require_input<'a>(
    name: &'static str,
    selection: &Bitmap,
    input: Option<&'a ValueBlock>,
) -> Result<&'a ValueBlock> {
    let block = input.ok_or_else(|| {
        BlockexecError::new("Aggregate expected a data block").with_field("aggregate", name)
    })?;

    if block.len() != selection.len() {
        return Err(BlockexecError::new("Data block length does not match selection")
            .with_field("aggregate", name)
            .with_field("block_len", block.len())
            .with_field("rows", selection.len()));
    }

    Ok(block)
}
