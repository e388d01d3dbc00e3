use crate::arrays::scalar::ScalarValue;

/// A fixed-length columnar sequence of scalar values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueBlock {
    values: Vec<ScalarValue>,
}

impl ValueBlock {
    /// Create a block containing a single value.
    ///
    /// Used to preserve a uniform block-shaped interface for output fields
    /// that are logically scalar.
    pub fn singleton(value: ScalarValue) -> Self {
        ValueBlock {
            values: vec![value],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value at index.
    ///
    /// Panics if index is out of bounds.
    pub fn value(&self, idx: usize) -> &ScalarValue {
        &self.values[idx]
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ScalarValue> {
        self.values.iter()
    }
}

impl<V: Into<ScalarValue>> FromIterator<V> for ValueBlock {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        ValueBlock {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_iter_and_access() {
        let block: ValueBlock = [1, 2, 3].into_iter().collect();
        assert_eq!(3, block.len());
        assert_eq!(&ScalarValue::Int32(2), block.value(1));
    }

    #[test]
    fn singleton() {
        let block = ValueBlock::singleton(ScalarValue::Int64(42));
        assert_eq!(1, block.len());
        assert_eq!(&ScalarValue::Int64(42), block.value(0));
    }
}
