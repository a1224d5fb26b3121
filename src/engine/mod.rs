//! Query engine and result streaming.

pub mod query;
pub mod stream;

pub use query::{intersect_tokens, Candidates, Query, QueryEngine};
pub use stream::ResultStream;
