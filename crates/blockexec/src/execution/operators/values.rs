use blockexec_error::{BlockexecError, Result};

use super::ChunkSource;
use crate::arrays::chunk::Chunk;

/// Chunk source over a fixed set of in-memory chunks.
#[derive(Debug)]
pub struct ValuesSource {
    chunks: Vec<Chunk>,
    idx: usize,
    opened: bool,
}

impl ValuesSource {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        ValuesSource {
            chunks,
            idx: 0,
            opened: false,
        }
    }
}

impl ChunkSource for ValuesSource {
    fn open(&mut self) -> Result<()> {
        self.idx = 0;
        self.opened = true;
        Ok(())
    }

    fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if !self.opened {
            return Err(BlockexecError::new("Values source has not been opened"));
        }

        match self.chunks.get(self.idx) {
            Some(chunk) => {
                self.idx += 1;
                Ok(Some(chunk.clone()))
            }
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.opened = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::chunk::GroupKeys;
    use crate::arrays::scalar::ScalarValue;

    fn test_chunk() -> Chunk {
        Chunk::try_new(
            GroupKeys::Scalar(ScalarValue::Int32(0)),
            [true, false].into_iter().collect(),
            [],
        )
        .unwrap()
    }

    #[test]
    fn yields_chunks_then_none() {
        let mut source = ValuesSource::new(vec![test_chunk(), test_chunk()]);
        source.open().unwrap();

        assert!(source.next_chunk().unwrap().is_some());
        assert!(source.next_chunk().unwrap().is_some());
        assert!(source.next_chunk().unwrap().is_none());
    }

    #[test]
    fn next_before_open_errors() {
        let mut source = ValuesSource::new(vec![test_chunk()]);
        source.next_chunk().unwrap_err();
    }

    #[test]
    fn reopen_restarts() {
        let mut source = ValuesSource::new(vec![test_chunk()]);
        source.open().unwrap();
        assert!(source.next_chunk().unwrap().is_some());
        assert!(source.next_chunk().unwrap().is_none());

        source.open().unwrap();
        assert!(source.next_chunk().unwrap().is_some());
    }
}
