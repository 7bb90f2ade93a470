mod detector;
mod error;
mod store;

pub use detector::{urgency_for, FollowUpDetector, FollowUpReport};
pub use error::{FollowUpError, StoreError};
pub use store::{MessageStore, SnapshotStore};
