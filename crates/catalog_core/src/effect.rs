use crate::{QueryParams, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Restart the debounce window with a new query, superseding any pending one.
    ScheduleFetch {
        request_id: RequestId,
        params: QueryParams,
    },
    LoadFilterOptions,
    SubscribePush,
    /// Tear down: cancel the pending fetch and drop the push subscription.
    Shutdown,
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn enriched(name: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: format!("\u{2018}{name}\u{2019} has been enriched with the latest data."),
        }
    }

    pub fn fetch_failed(error: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: format!("Failed to load games: {error}"),
        }
    }
}
