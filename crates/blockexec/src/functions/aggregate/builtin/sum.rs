use blockexec_error::{BlockexecError, Result};

use super::require_input;
use crate::arrays::bitmap::Bitmap;
use crate::arrays::block::ValueBlock;
use crate::arrays::scalar::ScalarValue;
use crate::functions::aggregate::{AggState, BlockAggregateFunction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sum;

impl BlockAggregateFunction for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn block_agg(&self, selection: &Bitmap, input: Option<&ValueBlock>) -> Result<ScalarValue> {
        let block = require_input(self.name(), selection, input)?;

        let mut sum: Option<ScalarValue> = None;
        for idx in selection.index_iter() {
            let value = block.value(idx).clone();
            sum = Some(match sum {
                None => value,
                Some(curr) => checked_add(curr, value)?,
            });
        }

        sum.ok_or_else(|| {
            BlockexecError::new("Reduction over empty selection").with_field("aggregate", "sum")
        })
    }

    fn row_agg(&self, state: AggState, partial: ScalarValue) -> Result<ScalarValue> {
        match state {
            None => Ok(partial),
            Some(curr) => checked_add(curr, partial),
        }
    }
}

/// Add two numeric values, promoting on overflow.
///
/// Int32 overflow promotes to Int64, Int64 overflow promotes to Float64. Any
/// float operand makes the result a float.
pub(crate) fn checked_add(left: ScalarValue, right: ScalarValue) -> Result<ScalarValue> {
    use ScalarValue as S;

    Ok(match (&left, &right) {
        (S::Int32(a), S::Int32(b)) => match a.checked_add(*b) {
            Some(v) => S::Int32(v),
            None => S::Int64(*a as i64 + *b as i64),
        },
        (S::Int32(a), S::Int64(b)) | (S::Int64(b), S::Int32(a)) => {
            add_i64(*a as i64, *b)
        }
        (S::Int64(a), S::Int64(b)) => add_i64(*a, *b),
        (a, b) if a.datatype().is_numeric() && b.datatype().is_numeric() => {
            S::Float64(a.as_f64()? + b.as_f64()?)
        }
        (a, b) => {
            return Err(BlockexecError::new("Cannot add values")
                .with_field("left", a.datatype())
                .with_field("right", b.datatype()))
        }
    })
}

fn add_i64(a: i64, b: i64) -> ScalarValue {
    match a.checked_add(b) {
        Some(v) => ScalarValue::Int64(v),
        None => ScalarValue::Float64(a as f64 + b as f64),
    }
}
