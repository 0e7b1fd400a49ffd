//! Building the original and modified snapshots side by side.

use tracing::debug;

use crate::error::SnapshotResult;
use crate::snapshot::EntitySnapshot;

/// Build two independent snapshots, returning `(original, modified)`.
///
/// With `parallel` set, each build runs on its own scoped thread and both
/// are joined before returning. The builds share no mutable state, so the
/// result is the same either way. If both builds fail, the original's
/// error is reported.
pub fn build_pair<A, B>(
    original: A,
    modified: B,
    parallel: bool,
) -> SnapshotResult<(EntitySnapshot, EntitySnapshot)>
where
    A: FnOnce() -> SnapshotResult<EntitySnapshot> + Send,
    B: FnOnce() -> SnapshotResult<EntitySnapshot> + Send,
{
    if !parallel {
        debug!("building snapshots sequentially");
        let original = original()?;
        let modified = modified()?;
        return Ok((original, modified));
    }

    debug!("building snapshots on two threads");
    let (original, modified) = std::thread::scope(|scope| {
        let handle = scope.spawn(modified);
        let original = original();
        let modified = match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (original, modified)
    });
    Ok((original?, modified?))
}
