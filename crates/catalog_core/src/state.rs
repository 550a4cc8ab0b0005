use crate::view_model::{ListViewModel, RecordRowView};
use crate::{
    build_query, merge_record, EnrichmentStatus, QueryParams, Record, SortColumn, SortRuleSet,
    ALL_SENTINEL,
};

/// Identifies one scheduled fetch. Increases monotonically per view.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    /// Debounce window running.
    Scheduled(RequestId),
    /// Request sent; its cancellation token is live.
    InFlight(RequestId),
}

impl FetchPhase {
    pub fn request_id(self) -> Option<RequestId> {
        match self {
            FetchPhase::Idle => None,
            FetchPhase::Scheduled(id) | FetchPhase::InFlight(id) => Some(id),
        }
    }
}

/// How the most recent fetch cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Resolved,
    Canceled,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterChange {
    Search(String),
    Genre(String),
    Status(String),
    Sort(SortColumn),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListViewState {
    records: Vec<Record>,
    search: String,
    genre: String,
    status: String,
    sort_rules: SortRuleSet,
    genre_options: Vec<String>,
    phase: FetchPhase,
    last_outcome: Option<FetchOutcome>,
    next_request_id: RequestId,
    mounted: bool,
    disposed: bool,
    dirty: bool,
}

impl ListViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn sort_rules(&self) -> &SortRuleSet {
        &self.sort_rules
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<FetchOutcome> {
        self.last_outcome
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Canonical query for the current inputs.
    pub fn query(&self) -> QueryParams {
        build_query(&self.search, &self.genre, &self.status, &self.sort_rules)
    }

    pub fn view(&self) -> ListViewModel {
        ListViewModel {
            rows: self.records.iter().map(RecordRowView::from).collect(),
            search: self.search.clone(),
            genre: self.genre.clone(),
            status: self.status.clone(),
            genre_options: self.genre_options.clone(),
            status_options: status_options(),
            name_sort: self.sort_rules.icon_for(SortColumn::Name),
            release_date_sort: self.sort_rules.icon_for(SortColumn::ReleaseDate),
            phase: self.phase,
            last_outcome: self.last_outcome,
            dirty: self.dirty,
        }
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mount(&mut self) -> bool {
        if self.mounted || self.disposed {
            return false;
        }
        self.mounted = true;
        true
    }

    pub(crate) fn dispose(&mut self) {
        self.disposed = true;
        if self.phase != FetchPhase::Idle {
            self.last_outcome = Some(FetchOutcome::Canceled);
        }
        self.phase = FetchPhase::Idle;
    }

    /// Applies an input change. Returns false when the value is unchanged and no
    /// fetch cycle should start.
    pub(crate) fn apply_change(&mut self, change: FilterChange) -> bool {
        let (field, value) = match change {
            FilterChange::Sort(column) => {
                self.sort_rules.toggle(column);
                self.mark_dirty();
                return true;
            }
            FilterChange::Search(value) => (&mut self.search, value),
            FilterChange::Genre(value) => (&mut self.genre, value),
            FilterChange::Status(value) => (&mut self.status, value),
        };
        if *field == value {
            return false;
        }
        *field = value;
        self.mark_dirty();
        true
    }

    /// Starts a new fetch cycle, superseding whatever cycle was pending.
    pub(crate) fn begin_cycle(&mut self) -> RequestId {
        if self.phase != FetchPhase::Idle {
            self.last_outcome = Some(FetchOutcome::Canceled);
        }
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.phase = FetchPhase::Scheduled(request_id);
        self.mark_dirty();
        request_id
    }

    pub(crate) fn is_current(&self, request_id: RequestId) -> bool {
        self.phase.request_id() == Some(request_id)
    }

    pub(crate) fn mark_in_flight(&mut self, request_id: RequestId) {
        if matches!(self.phase, FetchPhase::Scheduled(id) if id == request_id) {
            self.phase = FetchPhase::InFlight(request_id);
            self.mark_dirty();
        }
    }

    pub(crate) fn resolve(&mut self, records: Vec<Record>) {
        self.records = records;
        self.finish_cycle(FetchOutcome::Resolved);
    }

    pub(crate) fn fail(&mut self) {
        self.finish_cycle(FetchOutcome::Errored);
    }

    fn finish_cycle(&mut self, outcome: FetchOutcome) {
        self.phase = FetchPhase::Idle;
        self.last_outcome = Some(outcome);
        self.mark_dirty();
    }

    /// Patches a record in place. Returns false when the record is not visible.
    pub(crate) fn apply_push(&mut self, record: &Record) -> bool {
        let present = self.records.iter().any(|visible| visible.id == record.id);
        if present {
            let records = std::mem::take(&mut self.records);
            self.records = merge_record(records, record);
            self.mark_dirty();
        }
        present
    }

    pub(crate) fn set_genre_options(&mut self, options: Vec<String>) {
        self.genre_options = options;
        self.mark_dirty();
    }
}

fn status_options() -> Vec<String> {
    std::iter::once(ALL_SENTINEL.to_string())
        .chain(EnrichmentStatus::ALL.iter().map(|s| s.as_str().to_string()))
        .collect()
}
