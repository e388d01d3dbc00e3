use blockexec_error::{BlockexecError, Result};

use crate::arrays::bitmap::Bitmap;
use crate::arrays::block::ValueBlock;
use crate::arrays::scalar::ScalarValue;

/// Group key input for a chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKeys {
    /// A single key shared by every row of the chunk.
    Scalar(ScalarValue),
    /// One key per row.
    Block(ValueBlock),
}

/// One input record: a group key, a row selection bitmap, and zero or more
/// data blocks.
///
/// All contained sequences share the same row length.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub keys: GroupKeys,
    pub selection: Bitmap,
    pub data: Vec<ValueBlock>,
}

impl Chunk {
    pub fn try_new(
        keys: GroupKeys,
        selection: Bitmap,
        data: impl IntoIterator<Item = ValueBlock>,
    ) -> Result<Self> {
        let num_rows = selection.len();

        if let GroupKeys::Block(keys) = &keys {
            if keys.len() != num_rows {
                return Err(BlockexecError::new("Key block length does not match selection")
                    .with_field("keys", keys.len())
                    .with_field("rows", num_rows));
            }
        }

        let data: Vec<_> = data.into_iter().collect();
        for (idx, block) in data.iter().enumerate() {
            if block.len() != num_rows {
                return Err(BlockexecError::new("Data block length does not match selection")
                    .with_field("block_idx", idx)
                    .with_field("block_len", block.len())
                    .with_field("rows", num_rows));
            }
        }

        Ok(Chunk {
            keys,
            selection,
            data,
        })
    }

    /// Number of rows in this chunk.
    pub fn num_rows(&self) -> usize {
        self.selection.len()
    }
}
