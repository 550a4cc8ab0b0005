use crate::{PushEvent, Record, RequestId, SortColumn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The list view became visible.
    Mounted,
    /// User edited the search box.
    SearchChanged(String),
    /// User picked a genre (or `all`).
    GenreChanged(String),
    /// User picked an enrichment status (or `all`).
    StatusChanged(String),
    /// User clicked a sortable column header.
    SortToggled(SortColumn),
    /// Debounce window elapsed and the request was sent.
    FetchStarted { request_id: RequestId },
    /// The list request completed.
    FetchResolved {
        request_id: RequestId,
        records: Vec<Record>,
    },
    /// The list request failed (cancellation never arrives here).
    FetchFailed { request_id: RequestId, error: String },
    /// Genre options arrived.
    FilterOptionsLoaded(Vec<String>),
    /// Genre options could not be loaded.
    FilterOptionsFailed(String),
    /// Enrichment worker published a record update.
    PushReceived(PushEvent),
    /// The list view is going away.
    Disposed,
    /// Fallback for placeholder wiring.
    NoOp,
}
