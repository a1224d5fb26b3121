//! The isolation boundary between the search engine and its caller.
//!
//! The engine runs in a worker task that shares no mutable state with the
//! caller. Requests and responses travel over channels and are correlated by
//! request id; there is no explicit cancel, callers just ignore stale ids.

pub mod actor;
pub mod buffer;
pub mod session;

pub use actor::{spawn_worker, WorkerHandle};
pub use buffer::{BufferEvent, ResultBuffer};
pub use session::CompendiumSession;
