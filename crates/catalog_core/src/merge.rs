use crate::Record;

/// Replaces the record sharing `updated.id` in place.
///
/// Records absent from `current` are not inserted: the list mirrors a filtered and
/// sorted server query, and the update carries no information about where (or
/// whether) it belongs. The merge never re-applies the active filters either, so a
/// record whose status drifts outside the status filter stays visible until the next
/// fetch.
pub fn merge_record(mut current: Vec<Record>, updated: &Record) -> Vec<Record> {
    if let Some(slot) = current.iter_mut().find(|record| record.id == updated.id) {
        *slot = updated.clone();
    }
    current
}
