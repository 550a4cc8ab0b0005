//! Catalog core: pure list-view state machine and the helpers it is built from.
mod effect;
mod merge;
mod msg;
mod query;
mod record;
mod sort;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notification, NotificationLevel};
pub use merge::merge_record;
pub use msg::Msg;
pub use query::{build_query, FilterField, QueryParams, ALL_SENTINEL};
pub use record::{EnrichmentStatus, PushEvent, Record, RecordId};
pub use sort::{SortColumn, SortDirection, SortIcon, SortRule, SortRuleSet};
pub use state::{FetchOutcome, FetchPhase, ListViewState, RequestId};
pub use update::update;
pub use view_model::{ListViewModel, RecordRowView};
