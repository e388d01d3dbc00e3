use std::cmp::Ordering;

use blockexec_error::{BlockexecError, Result};

use super::require_input;
use crate::arrays::bitmap::Bitmap;
use crate::arrays::block::ValueBlock;
use crate::arrays::scalar::ScalarValue;
use crate::functions::aggregate::{AggState, BlockAggregateFunction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Min;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Max;

impl BlockAggregateFunction for Min {
    fn name(&self) -> &'static str {
        "min"
    }

    fn block_agg(&self, selection: &Bitmap, input: Option<&ValueBlock>) -> Result<ScalarValue> {
        reduce_extreme(self.name(), selection, input, Ordering::Less)
    }

    fn row_agg(&self, state: AggState, partial: ScalarValue) -> Result<ScalarValue> {
        combine_extreme(state, partial, Ordering::Less)
    }
}

impl BlockAggregateFunction for Max {
    fn name(&self) -> &'static str {
        "max"
    }

    fn block_agg(&self, selection: &Bitmap, input: Option<&ValueBlock>) -> Result<ScalarValue> {
        reduce_extreme(self.name(), selection, input, Ordering::Greater)
    }

    fn row_agg(&self, state: AggState, partial: ScalarValue) -> Result<ScalarValue> {
        combine_extreme(state, partial, Ordering::Greater)
    }
}

/// Reduce selected rows to the extreme value for the wanted ordering.
fn reduce_extreme(
    name: &'static str,
    selection: &Bitmap,
    input: Option<&ValueBlock>,
    wanted: Ordering,
) -> Result<ScalarValue> {
    let block = require_input(name, selection, input)?;

    let mut extreme: Option<&ScalarValue> = None;
    for idx in selection.index_iter() {
        let value = block.value(idx);
        extreme = Some(match extreme {
            None => value,
            Some(curr) => {
                if value.try_cmp(curr)? == wanted {
                    value
                } else {
                    curr
                }
            }
        });
    }

    // Partitioning never produces an empty selection.
    extreme.cloned().ok_or_else(|| {
        BlockexecError::new("Reduction over empty selection").with_field("aggregate", name)
    })
}

fn combine_extreme(state: AggState, partial: ScalarValue, wanted: Ordering) -> Result<ScalarValue> {
    Ok(match state {
        None => partial,
        Some(curr) => {
            if partial.try_cmp(&curr)? == wanted {
                partial
            } else {
                curr
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_block_respects_selection() {
        let selection = Bitmap::from_iter([true, true, false]);
        let block: ValueBlock = [50, 20, 3].into_iter().collect();

        let partial = Min.block_agg(&selection, Some(&block)).unwrap();
        assert_eq!(ScalarValue::Int32(20), partial);
    }

    #[test]
    fn max_block_respects_selection() {
        let selection = Bitmap::from_iter([false, true, true]);
        let block: ValueBlock = [90, 20, 30].into_iter().collect();

        let partial = Max.block_agg(&selection, Some(&block)).unwrap();
        assert_eq!(ScalarValue::Int32(30), partial);
    }

    #[test]
    fn min_combine_absent_is_identity() {
        let got = Min.row_agg(None, ScalarValue::Int32(7)).unwrap();
        assert_eq!(ScalarValue::Int32(7), got);
    }

    #[test]
    fn min_combine_keeps_smaller() {
        let got = Min
            .row_agg(Some(ScalarValue::Int32(7)), ScalarValue::Int64(3))
            .unwrap();
        assert_eq!(ScalarValue::Int64(3), got);

        let got = Min
            .row_agg(Some(ScalarValue::Int32(2)), ScalarValue::Int64(3))
            .unwrap();
        assert_eq!(ScalarValue::Int32(2), got);
    }

    #[test]
    fn min_missing_input_errors() {
        let selection = Bitmap::from_iter([true]);
        Min.block_agg(&selection, None).unwrap_err();
    }

    #[test]
    fn min_type_error_propagates() {
        let selection = Bitmap::from_iter([true, true]);
        let block: ValueBlock = [ScalarValue::Int32(1), ScalarValue::from("a")]
            .into_iter()
            .collect();

        Min.block_agg(&selection, Some(&block)).unwrap_err();
    }
}
