pub mod bitmap;
pub mod block;
pub mod chunk;
pub mod datatype;
pub mod scalar;
