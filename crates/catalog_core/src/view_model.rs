use crate::{EnrichmentStatus, FetchOutcome, FetchPhase, Record, RecordId, SortIcon};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListViewModel {
    pub rows: Vec<RecordRowView>,
    pub search: String,
    pub genre: String,
    pub status: String,
    pub genre_options: Vec<String>,
    pub status_options: Vec<String>,
    pub name_sort: SortIcon,
    pub release_date_sort: SortIcon,
    pub phase: FetchPhase,
    pub last_outcome: Option<FetchOutcome>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub id: RecordId,
    pub name: String,
    pub genre: String,
    pub release_date: String,
    pub steam_app_id: Option<u64>,
    pub status: EnrichmentStatus,
    pub description: String,
}

impl From<&Record> for RecordRowView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            genre: record.genre.clone().unwrap_or_default(),
            release_date: record.release_date.clone().unwrap_or_default(),
            steam_app_id: record.steam_app_id,
            status: record.enrichment_status,
            description: record.short_description.clone().unwrap_or_default(),
        }
    }
}
