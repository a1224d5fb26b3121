//! Index structures for fast lookup. The index is rebuilt wholesale whenever
//! the dataset changes.

pub mod search_index;
pub mod tokenizer;

pub use search_index::{search_vector, SearchIndex};
pub use tokenizer::tokenize;
