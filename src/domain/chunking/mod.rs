// Splitting datasets into evaluation chunks
pub mod chunk;
pub mod chunker;

pub use chunk::Chunk;
pub use chunker::{Chunker, DEFAULT_CHUNK_COUNT, Incomplete, PeriodOffset};
