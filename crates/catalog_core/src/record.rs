use std::fmt;

use serde::{Deserialize, Serialize};

pub type RecordId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Pending,
    InProgress,
    Skipped,
    Invalid,
    Failed,
    Done,
}

impl EnrichmentStatus {
    pub const ALL: [EnrichmentStatus; 6] = [
        EnrichmentStatus::Pending,
        EnrichmentStatus::InProgress,
        EnrichmentStatus::Skipped,
        EnrichmentStatus::Invalid,
        EnrichmentStatus::Failed,
        EnrichmentStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnrichmentStatus::Pending => "pending",
            EnrichmentStatus::InProgress => "in_progress",
            EnrichmentStatus::Skipped => "skipped",
            EnrichmentStatus::Invalid => "invalid",
            EnrichmentStatus::Failed => "failed",
            EnrichmentStatus::Done => "done",
        }
    }

    /// Only `done` counts as a successful end of enrichment.
    pub fn is_terminal_success(self) -> bool {
        self == EnrichmentStatus::Done
    }
}

impl fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry as served by the games API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub steam_app_id: Option<u64>,
    #[serde(default)]
    pub genre: Option<String>,
    pub enrichment_status: EnrichmentStatus,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
}

/// Out-of-band update published when the enrichment worker touches a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "game")]
    pub record: Record,
    pub status: EnrichmentStatus,
}
