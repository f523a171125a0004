//! Selection policy for discovered updates

use drvup_types::{SelectedSet, UpdateItem};

/// Decide which discovered updates proceed to acquisition.
///
/// The policy is deliberately fixed: take everything the search matched,
/// in discovery order. Dry runs select nothing, which is how the pipeline
/// guarantees no download or install is ever issued for them.
#[must_use]
pub fn select_for_install(candidates: Vec<UpdateItem>, dry_run: bool) -> SelectedSet {
    if dry_run {
        SelectedSet::empty()
    } else {
        SelectedSet::new(candidates)
    }
}
