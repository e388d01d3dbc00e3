use std::borrow::Cow;

use ahash::RandomState;
use blockexec_error::Result;
use hashbrown::HashMap;

use super::hash_table::GroupKey;
use crate::arrays::bitmap::Bitmap;
use crate::arrays::chunk::{Chunk, GroupKeys};
use crate::arrays::scalar::ScalarValue;

/// Partition a chunk's active rows by group key.
///
/// Returns one `(key, effective mask)` pair per distinct key with at least
/// one active row; the masks cover exactly the chunk's active rows. A key
/// whose rows are all masked out yields no pair. No ordering guarantee.
pub(crate) fn partition_chunk(chunk: &Chunk) -> Result<Vec<(ScalarValue, Cow<'_, Bitmap>)>> {
    match &chunk.keys {
        GroupKeys::Scalar(key) => {
            if chunk.selection.count_trues() == 0 {
                return Ok(Vec::new());
            }
            Ok(vec![(key.clone(), Cow::Borrowed(&chunk.selection))])
        }
        GroupKeys::Block(keys) => {
            let num_rows = chunk.num_rows();
            let mut buckets: HashMap<GroupKey, Bitmap, RandomState> = HashMap::default();

            for idx in chunk.selection.index_iter() {
                let mask = buckets
                    .entry(GroupKey(keys.value(idx).clone()))
                    .or_insert_with(|| Bitmap::new_with_all_false(num_rows));
                mask.set_unchecked(idx, true);
            }

            Ok(buckets
                .into_iter()
                .map(|(key, mask)| (key.0, Cow::Owned(mask)))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_with_block_keys(keys: &[i32], bits: &[bool]) -> Chunk {
        Chunk::try_new(
            GroupKeys::Block(keys.iter().copied().collect()),
            bits.iter().copied().collect(),
            [],
        )
        .unwrap()
    }

    #[test]
    fn scalar_all_false_yields_nothing() {
        let chunk = Chunk::try_new(
            GroupKeys::Scalar(ScalarValue::Int32(0)),
            [false, false, false].into_iter().collect(),
            [],
        )
        .unwrap();

        let parts = partition_chunk(&chunk).unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn scalar_single_pair_borrows_mask() {
        let chunk = Chunk::try_new(
            GroupKeys::Scalar(ScalarValue::Int32(7)),
            [true, false, true].into_iter().collect(),
            [],
        )
        .unwrap();

        let parts = partition_chunk(&chunk).unwrap();
        assert_eq!(1, parts.len());
        assert_eq!(ScalarValue::Int32(7), parts[0].0);
        assert_eq!(&chunk.selection, parts[0].1.as_ref());
    }

    #[test]
    fn block_keys_bucket_by_equality() {
        let chunk = chunk_with_block_keys(&[1, 2, 1], &[true, true, true]);

        let mut parts = partition_chunk(&chunk).unwrap();
        parts.sort_by(|a, b| a.0.try_cmp(&b.0).unwrap());

        assert_eq!(2, parts.len());
        assert_eq!(ScalarValue::Int32(1), parts[0].0);
        let mask1: Vec<_> = parts[0].1.iter().collect();
        assert_eq!(vec![true, false, true], mask1);

        assert_eq!(ScalarValue::Int32(2), parts[1].0);
        let mask2: Vec<_> = parts[1].1.iter().collect();
        assert_eq!(vec![false, true, false], mask2);
    }

    #[test]
    fn masked_out_key_is_excluded() {
        // Key 2 is present in the data but never selected.
        let chunk = chunk_with_block_keys(&[1, 2, 3], &[true, false, true]);

        let mut parts = partition_chunk(&chunk).unwrap();
        parts.sort_by(|a, b| a.0.try_cmp(&b.0).unwrap());

        assert_eq!(2, parts.len());
        assert_eq!(ScalarValue::Int32(1), parts[0].0);
        assert_eq!(ScalarValue::Int32(3), parts[1].0);
    }

    #[test]
    fn block_all_false_yields_nothing() {
        let chunk = chunk_with_block_keys(&[1, 2, 3], &[false, false, false]);
        let parts = partition_chunk(&chunk).unwrap();
        assert!(parts.is_empty());
    }
}
