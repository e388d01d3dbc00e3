//! Error type shared across the blockexec crates.

use std::error::Error;
use std::fmt;

pub type Result<T, E = BlockexecError> = std::result::Result<T, E>;

/// An error with an optional set of contextual fields.
#[derive(Debug)]
pub struct BlockexecError {
    inner: Box<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    msg: String,
    fields: Vec<(&'static str, String)>,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl BlockexecError {
    pub fn new(msg: impl Into<String>) -> Self {
        BlockexecError {
            inner: Box::new(ErrorInner {
                msg: msg.into(),
                fields: Vec::new(),
                source: None,
            }),
        }
    }

    pub fn with_source(msg: impl Into<String>, source: Box<dyn Error + Send + Sync>) -> Self {
        BlockexecError {
            inner: Box::new(ErrorInner {
                msg: msg.into(),
                fields: Vec::new(),
                source: Some(source),
            }),
        }
    }

    /// Attach a contextual field to the error.
    pub fn with_field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.inner.fields.push((key, value.to_string()));
        self
    }
}

impl fmt::Display for BlockexecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.msg)?;
        for (key, value) in &self.inner.fields {
            write!(f, "\n  {key}: {value}")?;
        }
        Ok(())
    }
}

impl Error for BlockexecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source.as_ref().map(|s| {
            let err: &(dyn Error + 'static) = s.as_ref();
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_fields() {
        let err = BlockexecError::new("length mismatch")
            .with_field("want", 4)
            .with_field("got", 3);

        let out = err.to_string();
        assert!(out.contains("length mismatch"));
        assert!(out.contains("want: 4"));
        assert!(out.contains("got: 3"));
    }
}
