use std::fmt;

use blockexec_error::{BlockexecError, Result};

/// An LSB ordered bitmap used for row selection.
///
/// A 'true' bit marks a row as active.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    len: usize,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn new_with_all_true(len: usize) -> Self {
        let cap = (len + 7) / 8;
        Bitmap {
            len,
            data: vec![u8::MAX; cap],
        }
    }

    pub fn new_with_all_false(len: usize) -> Self {
        let cap = (len + 7) / 8;
        Bitmap {
            len,
            data: vec![0; cap],
        }
    }

    /// Get the number of bits being tracked by this bitmap.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_trues(&self) -> usize {
        let mut count = self
            .data
            .iter()
            .map(|&b| b.count_ones() as usize)
            .sum::<usize>();

        // Only count bits that make up the logical portion of the bitmap.
        let rem = self.len % 8;
        if rem != 0 {
            let last = self.data.last().unwrap();
            count -= last.count_ones() as usize;
            let mask = (255 << (8 - rem)) >> (8 - rem);
            count += (mask & last).count_ones() as usize;
        }

        count
    }

    /// Get the value at index.
    ///
    /// Panics if index is out of bounds.
    #[inline]
    pub fn value(&self, idx: usize) -> bool {
        let byte = self.data[idx >> 3];
        (byte >> (idx & 7)) & 1 != 0
    }

    /// Set a bit at index.
    ///
    /// Panics if index is out of bounds.
    #[inline]
    pub fn set_unchecked(&mut self, idx: usize, val: bool) {
        let byte = idx / 8;
        let bit = idx & 7;
        if val {
            self.data[byte] |= 1 << bit;
        } else {
            self.data[byte] &= !(1 << bit);
        }
    }

    /// Bit AND this bitmap with some other bitmap.
    pub fn bit_and_mut(&mut self, other: &Bitmap) -> Result<()> {
        if self.len() != other.len() {
            return Err(BlockexecError::new("Bitmap lengths do not match (and)")
                .with_field("left", self.len())
                .with_field("right", other.len()));
        }

        for (byte, other) in self.data.iter_mut().zip(other.data.iter()) {
            *byte &= *other;
        }

        Ok(())
    }

    /// Get an iterator over the individual bits.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len).map(|idx| self.value(idx))
    }

    /// Get an iterator over indexes of the bitmap where the bit is set.
    pub const fn index_iter(&self) -> BitmapIndexIter<'_> {
        BitmapIndexIter {
            front: 0,
            bitmap: self,
        }
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<_> = self.iter().collect();
        f.debug_struct("Bitmap").field("values", &values).finish()
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut bm = Bitmap::default();
        for bit in iter {
            if bm.len == bm.data.len() * 8 {
                bm.data.push(0);
            }
            let idx = bm.len;
            bm.len += 1;
            bm.set_unchecked(idx, bit);
        }
        bm
    }
}

/// Iterator over all set indexes in the bitmap.
#[derive(Debug)]
pub struct BitmapIndexIter<'a> {
    front: usize,
    bitmap: &'a Bitmap,
}

impl Iterator for BitmapIndexIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.bitmap.len() {
            let idx = self.front;
            self.front += 1;
            if self.bitmap.value(idx) {
                return Some(idx);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple() {
        let bits = [true, false, true, false, true, true, true, true];
        let bm = Bitmap::from_iter(bits);

        assert_eq!(8, bm.len());

        let got: Vec<_> = bm.iter().collect();
        assert_eq!(bits.as_slice(), got);
    }

    #[test]
    fn not_multiple_of_eight() {
        let bits = [
            true, false, true, false, true, true, true, true, //
            true, false, true, false,
        ];
        let bm = Bitmap::from_iter(bits);

        assert_eq!(12, bm.len());
        assert_eq!(8, bm.count_trues());
    }

    #[test]
    fn bit_and() {
        let mut left = Bitmap::from_iter([true, true, false, true]);
        let right = Bitmap::from_iter([true, false, true, true]);

        left.bit_and_mut(&right).unwrap();

        let got: Vec<_> = left.iter().collect();
        assert_eq!(vec![true, false, false, true], got);
        assert_eq!(2, left.count_trues());
    }

    #[test]
    fn bit_and_length_mismatch() {
        let mut left = Bitmap::from_iter([true, true]);
        let right = Bitmap::from_iter([true, false, true]);

        left.bit_and_mut(&right).unwrap_err();
    }

    #[test]
    fn index_iter() {
        let bm = Bitmap::from_iter([false, true, false, false, true, true]);
        let got: Vec<_> = bm.index_iter().collect();
        assert_eq!(vec![1, 4, 5], got);
    }

    #[test]
    fn count_trues_all_false() {
        let bm = Bitmap::new_with_all_false(11);
        assert_eq!(0, bm.count_trues());

        let bm = Bitmap::new_with_all_true(11);
        assert_eq!(11, bm.count_trues());
    }
}
