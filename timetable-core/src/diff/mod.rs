//! Change detection between two snapshots of the feed.

mod change_kind;
mod change_record;
mod fingerprint;
mod snapshot_diff;

pub use change_kind::ChangeKind;
pub use change_record::{ChangeRecord, field_changes};
pub use fingerprint::fingerprint;
pub use snapshot_diff::{SnapshotDiff, diff_snapshots};
