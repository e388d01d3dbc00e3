//! Vectorized hash aggregation over chunks of block data.
pub mod arrays;
pub mod execution;
pub mod functions;
