pub mod resolver;
pub mod search;
pub mod sync;

pub use search::SearchOutcome;
pub use sync::{SyncError, SyncOutcome};
